// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column flattening.
//!
//! Walks an entity depth-first and emits one column per typed leaf. Nested
//! value objects become sibling columns named after their field path:
//!
//! ```text
//! Car { id, spec: Spec { battery: Battery { capacity } } }
//!   -> id, spec_battery_capacity
//! ```
//!
//! Column order is pre-order declaration order and drives the bind order of
//! every INSERT/UPDATE built from the mapping.
//!
//! # Type resolution
//!
//! 1. `Column(type = …)` override
//! 2. [`TypeCatalog`] entry
//! 3. `TEXT` for enums
//! 4. otherwise recurse into nested fields, or fail for an unknown leaf

use convert_case::{Case, Casing};
use repogen_core::DbType;

use crate::{
    Error, Result,
    catalog::TypeCatalog,
    model::{Annotated, ColumnAnnotation, Field, Klass, Type, names}
};

/// Resolved column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name, unquoted.
    pub name: String,

    /// Column accepts NULL.
    pub nullable: bool,

    /// Column type.
    pub db_type: DbType,

    /// Primary-key member.
    pub is_id: bool,

    /// Optimistic-lock counter.
    pub is_version: bool
}

/// Column together with the entity field it maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Field names from the entity root to the leaf.
    pub path: Vec<String>,

    /// Leaf field type.
    pub ty: Type,

    /// Column definition.
    pub definition: ColumnDefinition
}

impl ColumnMapping {
    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Dotted field path, e.g. `spec.battery.capacity`.
    #[must_use]
    pub fn field_path(&self) -> String {
        self.path.join(".")
    }

    /// Leaf field name.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Check whether the path ends with `suffix`.
    #[must_use]
    pub fn ends_with(&self, suffix: &[String]) -> bool {
        !suffix.is_empty() && self.path.ends_with(suffix)
    }
}

/// Flattens entity classes into columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFlattener<'a> {
    catalog: &'a TypeCatalog
}

impl<'a> ColumnFlattener<'a> {
    /// Create a flattener using the given catalog.
    pub const fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog
        }
    }

    /// Resolve the column type of a field, if it maps to a single column.
    #[must_use]
    pub fn column_type(&self, field: &Field) -> Option<DbType> {
        let column = ColumnAnnotation::of(field);
        column
            .db_type
            .as_deref()
            .map(DbType::parse)
            .or_else(|| self.type_of(&field.ty))
    }

    /// Resolve the column type of a bare type use.
    #[must_use]
    pub fn type_of(&self, ty: &Type) -> Option<DbType> {
        self.catalog
            .resolve(ty)
            .map(|known| known.db_type)
            .or_else(|| ty.klass.is_enum.then_some(DbType::Text))
    }

    /// Flatten an entity into columns.
    ///
    /// # Errors
    ///
    /// - [`Error::UnmappableType`] for a leaf field of unknown type
    /// - [`Error::NullableComposite`] for an `Option` of a value object
    pub fn flatten(&self, entity: &Klass) -> Result<Vec<ColumnMapping>> {
        let mut columns = Vec::new();
        self.walk(entity, &[], &mut columns)?;
        Ok(columns)
    }

    fn walk(&self, klass: &Klass, prefix: &[String], out: &mut Vec<ColumnMapping>) -> Result<()> {
        for field in &klass.fields {
            let mut path = prefix.to_vec();
            path.push(field.name.clone());

            if let Some(db_type) = self.column_type(field) {
                let name = ColumnAnnotation::of(field)
                    .name
                    .unwrap_or_else(|| column_name(&path));
                out.push(ColumnMapping {
                    definition: ColumnDefinition {
                        name,
                        nullable: field.ty.is_nullable(),
                        db_type,
                        is_id: field.has_annotation(names::ID),
                        is_version: field.has_annotation(names::VERSION)
                    },
                    ty: field.ty.clone(),
                    path
                });
            } else if field.ty.klass.is_composite() {
                if field.ty.is_nullable() {
                    return Err(Error::NullableComposite {
                        path: path.join(".")
                    });
                }
                self.walk(&field.ty.klass, &path, out)?;
            } else {
                return Err(Error::UnmappableType {
                    path: path.join(".")
                });
            }
        }
        Ok(())
    }
}

/// Derived column name: snake_case of each path element, joined by `_`.
#[must_use]
pub fn column_name(path: &[String]) -> String {
    path.iter()
        .map(|part| part.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Annotation, QualifiedName};

    fn klass(name: &str) -> Klass {
        Klass::new(QualifiedName::simple(name))
    }

    fn car() -> Klass {
        let battery = klass("Battery")
            .with_field(Field::new("capacity", Type::named("i32")))
            .with_field(
                Field::new("chemistry", Type::named("String").nullable())
                    .with_annotation(Annotation::new(names::COLUMN).with("name", "battery_kind"))
            );
        let spec = klass("Spec")
            .with_field(Field::new("battery", Type::new(battery)))
            .with_field(Field::new("doors", Type::named("i16")));
        let color = Klass::enumeration(QualifiedName::simple("Color"));

        klass("Car")
            .with_field(
                Field::new("id", Type::named("uuid::Uuid"))
                    .with_annotation(Annotation::new(names::ID))
            )
            .with_field(Field::new("spec", Type::new(spec)))
            .with_field(Field::new("color", Type::new(color)))
            .with_field(
                Field::new("tags", Type::named("Vec").with_parameters(vec![Type::named("String")]))
            )
            .with_field(
                Field::new("modelYear", Type::named("i32"))
                    .with_annotation(Annotation::new(names::COLUMN).with("type", "smallint"))
            )
            .with_field(
                Field::new("version", Type::named("i64"))
                    .with_annotation(Annotation::new(names::VERSION))
            )
    }

    #[test]
    fn flattens_in_preorder() {
        let catalog = TypeCatalog::new();
        let columns = ColumnFlattener::new(&catalog).flatten(&car()).unwrap();
        let names: Vec<_> = columns.iter().map(ColumnMapping::name).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "spec_battery_capacity",
                "battery_kind",
                "spec_doors",
                "color",
                "tags",
                "model_year",
                "version",
            ]
        );
    }

    #[test]
    fn resolves_types_and_flags() {
        let catalog = TypeCatalog::new();
        let columns = ColumnFlattener::new(&catalog).flatten(&car()).unwrap();

        assert!(columns[0].definition.is_id);
        assert_eq!(columns[0].definition.db_type, DbType::Uuid);
        assert_eq!(columns[1].field_path(), "spec.battery.capacity");
        assert!(columns[2].definition.nullable);
        assert_eq!(columns[4].definition.db_type, DbType::Text);
        assert_eq!(columns[5].definition.db_type, DbType::Jsonb);
        assert_eq!(columns[6].definition.db_type, DbType::SmallInt);
        assert!(columns[7].definition.is_version);
        assert!(!columns[7].definition.nullable);
    }

    #[test]
    fn flattening_is_deterministic() {
        let catalog = TypeCatalog::new();
        let flattener = ColumnFlattener::new(&catalog);
        assert_eq!(flattener.flatten(&car()).unwrap(), flattener.flatten(&car()).unwrap());
    }

    #[test]
    fn unknown_leaf_fails_with_path() {
        let catalog = TypeCatalog::new();
        let entity = klass("Person").with_field(Field::new(
            "home",
            Type::new(klass("Address").with_field(Field::new("geo", Type::named("geo::Point"))))
        ));
        let err = ColumnFlattener::new(&catalog).flatten(&entity).unwrap_err();
        assert!(matches!(err, Error::UnmappableType { ref path } if path == "home.geo"));
    }

    #[test]
    fn nullable_composite_fails() {
        let catalog = TypeCatalog::new();
        let address = klass("Address").with_field(Field::new("city", Type::named("String")));
        let entity = klass("Person").with_field(Field::new("home", Type::new(address).nullable()));
        let err = ColumnFlattener::new(&catalog).flatten(&entity).unwrap_err();
        assert!(matches!(err, Error::NullableComposite { ref path } if path == "home"));
    }

    #[test]
    fn column_name_snake_cases_each_segment() {
        let path = vec!["homeAddress".to_string(), "zipCode".to_string()];
        assert_eq!(column_name(&path), "home_address_zip_code");
    }
}
