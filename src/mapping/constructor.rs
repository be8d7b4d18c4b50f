// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row to object reconstruction plans.
//!
//! The inverse of [`ColumnFlattener`](super::ColumnFlattener): an
//! [`ObjectConstructor`] tree says which column feeds which field and how
//! nested value objects are reassembled.
//!
//! # Leaf kinds
//!
//! | Condition | Extractor flags |
//! |-----------|-----------------|
//! | column type is `JSONB` | `is_json` |
//! | field class is an enum | `is_enum` (stored by variant name) |
//! | nullable field with a primitive accessor | `is_primitive` + `is_nullable` |
//! | anything else | plain accessor |
//!
//! # Projections
//!
//! A projection class may nest differently from the entity. Its leaves are
//! matched against entity columns by field-path suffix: projection field
//! `battery.capacity` matches entity column path `spec.battery.capacity`.
//! An exact path match wins; a suffix shared by several columns is an
//! error.

use crate::{
    Error, Result,
    catalog::TypeCatalog,
    mapping::ColumnMapping,
    model::{Klass, QualifiedName, Type}
};

/// Reconstruction plan node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectConstructor {
    /// Build an instance from nested plans.
    Constructor {
        /// Owning field name; `None` at the root.
        field_name: Option<String>,
        /// Class to instantiate.
        class_name: QualifiedName,
        /// Child plans in field declaration order.
        nested:     Vec<ObjectConstructor>
    },

    /// Read one value.
    Extractor(Extractor)
}

/// Leaf value source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    /// Source column; `None` for standalone scalar results.
    pub column_name: Option<String>,

    /// Target field; `None` at the root.
    pub field_name: Option<String>,

    /// Target type.
    pub field_type: Type,

    /// Accessor name.
    pub accessor: String,

    /// Value goes through a JSON codec.
    pub is_json: bool,

    /// Value is an enum stored by variant name.
    pub is_enum: bool,

    /// Accessor yields a zero value on NULL.
    pub is_primitive: bool,

    /// Target accepts absent values.
    pub is_nullable: bool
}

impl Extractor {
    /// Check whether the emitter must test for NULL after the accessor
    /// call.
    #[must_use]
    pub fn needs_null_check(&self) -> bool {
        self.is_primitive && self.is_nullable
    }
}

impl ObjectConstructor {
    /// Column names read by this plan, in reading order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'s>(&'s self, out: &mut Vec<&'s str>) {
        match self {
            Self::Constructor {
                nested, ..
            } => nested.iter().for_each(|n| n.collect_columns(out)),
            Self::Extractor(extractor) => {
                if let Some(column) = &extractor.column_name {
                    out.push(column);
                }
            }
        }
    }
}

/// Builds [`ObjectConstructor`] trees.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorPlanner<'a> {
    catalog: &'a TypeCatalog
}

impl<'a> ConstructorPlanner<'a> {
    /// Create a planner using the given catalog.
    pub const fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog
        }
    }

    /// Plan reconstruction of a full entity row.
    ///
    /// `columns` must be the flattened columns of `entity`.
    ///
    /// # Errors
    ///
    /// [`Error::UnmappableType`] when a field has no column.
    pub fn entity(&self, entity: &Klass, columns: &[ColumnMapping]) -> Result<ObjectConstructor> {
        self.node(entity, None, &[], &|path: &[String]| {
            columns.iter().filter(|c| c.path == path).collect()
        })
        .map_err(|unresolved| Error::UnmappableType {
            path: unresolved.path().to_string()
        })
    }

    /// Plan reconstruction of a projection and return the entity columns it
    /// reads, in reading order.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownProjectionField`] when a projection leaf matches no
    /// entity column, [`Error::AmbiguousColumn`] when it matches several.
    pub fn projection<'c>(
        &self,
        function: &str,
        projection: &Klass,
        columns: &'c [ColumnMapping]
    ) -> Result<(ObjectConstructor, Vec<&'c ColumnMapping>)> {
        let resolve = |path: &[String]| {
            let exact: Vec<_> = columns.iter().filter(|c| c.path == path).collect();
            if exact.is_empty() {
                columns.iter().filter(|c| c.ends_with(path)).collect()
            } else {
                exact
            }
        };
        let plan = self
            .node(projection, None, &[], &resolve)
            .map_err(|unresolved| match unresolved {
                Unresolved::Missing(path) => Error::UnknownProjectionField {
                    function: function.to_string(),
                    path
                },
                Unresolved::Ambiguous(path, candidates) => Error::AmbiguousColumn {
                    function: function.to_string(),
                    name: path,
                    candidates
                }
            })?;
        let used = plan
            .columns()
            .into_iter()
            .filter_map(|name| columns.iter().find(|c| c.name() == name))
            .collect();
        Ok((plan, used))
    }

    /// Plan extraction of a standalone scalar result.
    ///
    /// # Errors
    ///
    /// [`Error::UnmappableType`] when the type has no column mapping.
    pub fn scalar(&self, ty: &Type) -> Result<ObjectConstructor> {
        let known = self.catalog.resolve(ty);
        if known.is_none() && !ty.klass.is_enum {
            return Err(Error::UnmappableType {
                path: ty.to_string()
            });
        }
        let is_json = known.as_ref().is_some_and(|k| k.db_type.is_json());
        Ok(ObjectConstructor::Extractor(Extractor {
            column_name: None,
            field_name: None,
            field_type: ty.clone(),
            accessor: known
                .as_ref()
                .map_or("string", |k| k.accessor)
                .to_string(),
            is_json,
            is_enum: ty.klass.is_enum && !is_json,
            is_primitive: known.as_ref().is_some_and(|k| k.primitive),
            is_nullable: ty.is_nullable()
        }))
    }

    /// Plan one class level. `resolve` returns every column a field path
    /// may refer to.
    fn node<'c>(
        &self,
        klass: &Klass,
        field_name: Option<&str>,
        prefix: &[String],
        resolve: &dyn Fn(&[String]) -> Vec<&'c ColumnMapping>
    ) -> std::result::Result<ObjectConstructor, Unresolved> {
        let mut nested = Vec::with_capacity(klass.fields.len());
        for field in &klass.fields {
            let mut path = prefix.to_vec();
            path.push(field.name.clone());

            match resolve(&path).as_slice() {
                [column] => nested.push(self.leaf(column, &field.name, &field.ty)),
                [] if field.ty.klass.is_composite() => {
                    nested.push(self.node(&field.ty.klass, Some(&field.name), &path, resolve)?);
                }
                [] => return Err(Unresolved::Missing(path.join("."))),
                several => {
                    return Err(Unresolved::Ambiguous(
                        path.join("."),
                        several.iter().map(|c| c.name().to_string()).collect()
                    ));
                }
            }
        }
        Ok(ObjectConstructor::Constructor {
            field_name: field_name.map(str::to_string),
            class_name: klass.name.clone(),
            nested
        })
    }

    fn leaf(&self, column: &ColumnMapping, field_name: &str, ty: &Type) -> ObjectConstructor {
        let known = self.catalog.resolve(ty);
        let is_json = column.definition.db_type.is_json();
        let is_enum = !is_json && ty.klass.is_enum;
        let accessor = if is_json {
            TypeCatalog::accessor_for(&column.definition.db_type)
        } else if is_enum {
            "string"
        } else {
            known
                .as_ref()
                .map_or_else(|| TypeCatalog::accessor_for(&column.definition.db_type), |k| k.accessor)
        };

        ObjectConstructor::Extractor(Extractor {
            column_name: Some(column.name().to_string()),
            field_name: Some(field_name.to_string()),
            field_type: ty.clone(),
            accessor: accessor.to_string(),
            is_json,
            is_enum,
            is_primitive: !is_json && !is_enum && known.is_some_and(|k| k.primitive),
            is_nullable: ty.is_nullable()
        })
    }
}

/// Field path a plan could not bind to a column.
#[derive(Debug)]
enum Unresolved {
    /// No column matches.
    Missing(String),
    /// Several columns match; their names follow the path.
    Ambiguous(String, Vec<String>)
}

impl Unresolved {
    fn path(&self) -> &str {
        match self {
            Self::Missing(path) | Self::Ambiguous(path, _) => path
        }
    }
}
