// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Classes, types, fields and functions.
//!
//! A [`Type`] owns its [`Klass`] and a [`Klass`] owns the types of its
//! fields, so one entity is a self-contained tree that can be walked
//! without a symbol table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Annotated, Annotation, QualifiedName};

/// Nullability of a type use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    /// Value may be absent (`Option<T>`).
    Nullable,

    /// Value is always present.
    #[default]
    NonNullable
}

/// A class: entity, value object, enum, catalog type or repository
/// interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Klass {
    /// Type name.
    pub name: QualifiedName,

    /// Fields in declaration order; empty for enums and catalog types.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Class-level annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Declared functions (repository methods).
    #[serde(default)]
    pub functions: Vec<KlassFunction>,

    /// Interface (repository trait).
    #[serde(default)]
    pub is_interface: bool,

    /// Enum; terminal in every traversal.
    #[serde(default)]
    pub is_enum: bool,

    /// Generic argument of the declared supertype, e.g. `E` in
    /// `Repository<E>`.
    #[serde(default)]
    pub superclass_parameter: Option<Box<Type>>
}

impl Klass {
    /// Create a class without fields.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            fields: Vec::new(),
            annotations: Vec::new(),
            functions: Vec::new(),
            is_interface: false,
            is_enum: false,
            superclass_parameter: None
        }
    }

    /// Create an enum class.
    pub fn enumeration(name: QualifiedName) -> Self {
        Self {
            is_enum: true,
            ..Self::new(name)
        }
    }

    /// Create an interface class.
    pub fn interface(name: QualifiedName) -> Self {
        Self {
            is_interface: true,
            ..Self::new(name)
        }
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a function.
    #[must_use]
    pub fn with_function(mut self, function: KlassFunction) -> Self {
        self.functions.push(function);
        self
    }

    /// Append an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Set the supertype's generic argument.
    #[must_use]
    pub fn with_superclass_parameter(mut self, ty: Type) -> Self {
        self.superclass_parameter = Some(Box::new(ty));
        self
    }

    /// Check whether the class has nested fields to flatten.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !self.is_enum && !self.fields.is_empty()
    }

    /// Look up a function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&KlassFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

impl Annotated for Klass {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// A use of a class with nullability and generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    /// Referenced class.
    pub klass: Klass,

    /// Nullability of this use.
    #[serde(default)]
    pub nullability: Nullability,

    /// Generic arguments in order.
    #[serde(default)]
    pub parameters: Vec<Type>
}

impl Type {
    /// Non-nullable use of a class.
    pub fn new(klass: Klass) -> Self {
        Self {
            klass,
            nullability: Nullability::NonNullable,
            parameters: Vec::new()
        }
    }

    /// Non-nullable use of a fieldless class named by a path.
    pub fn named(path: &str) -> Self {
        Self::new(Klass::new(QualifiedName::from_path(path)))
    }

    /// The unit type `()`.
    pub fn unit() -> Self {
        Self::named("()")
    }

    /// Make this use nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullability = Nullability::Nullable;
        self
    }

    /// Set generic arguments.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<Type>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Check whether the value may be absent.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullability == Nullability::Nullable
    }

    /// Name of the referenced class.
    #[must_use]
    pub fn name(&self) -> &QualifiedName {
        &self.klass.name
    }

    /// First generic argument.
    #[must_use]
    pub fn element(&self) -> Option<&Type> {
        self.parameters.first()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nullable() {
            f.write_str("Option<")?;
        }
        write!(f, "{}", self.klass.name)?;
        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "<{params}>")?;
        }
        if self.is_nullable() {
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Class field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,

    /// Field type.
    #[serde(rename = "type")]
    pub ty: Type,

    /// Field annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>
}

impl Field {
    /// Create a field without annotations.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new()
        }
    }

    /// Append an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for Field {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,

    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: Type,

    /// Parameter annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>
}

impl Parameter {
    /// Create a parameter without annotations.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new()
        }
    }

    /// Append an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for Parameter {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Declared repository function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlassFunction {
    /// Function name.
    pub name: String,

    /// Parameters in declaration order, receiver excluded.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Declared return type.
    pub return_type: Type,

    /// Function annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Declared without a body.
    #[serde(default = "default_abstract")]
    pub is_abstract: bool
}

fn default_abstract() -> bool {
    true
}

impl KlassFunction {
    /// Create an abstract function.
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
            is_abstract: true
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for KlassFunction {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
