// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity to table mapping.
//!
//! # Architecture
//!
//! ```text
//! mapping.rs (coordinator, TableMapping)
//! ├── column.rs       - ColumnFlattener, ColumnMapping, ColumnDefinition
//! └── constructor.rs  - ConstructorPlanner, ObjectConstructor
//! ```
//!
//! A [`TableMapping`] is computed once per entity and shared by every
//! method of the repository.

mod column;
mod constructor;

pub use column::{ColumnDefinition, ColumnFlattener, ColumnMapping, column_name};
pub use constructor::{ConstructorPlanner, Extractor, ObjectConstructor};
use convert_case::{Case, Casing};

use crate::{
    Config, Error, Result,
    catalog::TypeCatalog,
    model::{Annotated, Klass, QualifiedName, names}
};

/// Flattened table of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    /// Entity class name.
    pub entity: QualifiedName,

    /// Table name, unquoted.
    pub name: String,

    /// Schema, unquoted.
    pub schema: Option<String>,

    /// Columns in pre-order declaration order.
    pub columns: Vec<ColumnMapping>,

    /// Row reconstruction plan; `None` for the unit type.
    pub constructor: Option<ObjectConstructor>
}

impl TableMapping {
    /// Build the mapping of `entity`.
    ///
    /// Table name and schema come from a `Table` annotation on the
    /// repository (`overrides`), then on the entity, then from the
    /// snake_cased class name and [`Config::default_schema`].
    ///
    /// # Errors
    ///
    /// Flattening errors, and [`Error::DuplicateColumn`] when two fields
    /// resolve to the same column name.
    pub fn build(
        entity: &Klass,
        overrides: Option<&Klass>,
        catalog: &TypeCatalog,
        config: &Config
    ) -> Result<Self> {
        let table_param = |key: &str| {
            overrides
                .and_then(|r| r.annotation(names::TABLE))
                .and_then(|a| a.param(key))
                .or_else(|| entity.annotation(names::TABLE).and_then(|a| a.param(key)))
                .map(str::to_string)
        };
        let name = table_param("name").unwrap_or_else(|| entity.name.name.to_case(Case::Snake));
        let schema = table_param("schema").or_else(|| config.default_schema.clone());

        if TypeCatalog::is_unit(&entity.name) {
            return Ok(Self {
                entity: entity.name.clone(),
                name,
                schema,
                columns: Vec::new(),
                constructor: None
            });
        }

        let columns = ColumnFlattener::new(catalog).flatten(entity)?;
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(Error::DuplicateColumn {
                    table:  name,
                    column: column.name().to_string()
                });
            }
        }
        let constructor = ConstructorPlanner::new(catalog).entity(entity, &columns)?;

        tracing::debug!(
            entity = %entity.name,
            table = %name,
            columns = columns.len(),
            "entity flattened"
        );

        Ok(Self {
            entity: entity.name.clone(),
            name,
            schema,
            columns,
            constructor: Some(constructor)
        })
    }

    /// Primary-key columns in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|c| c.definition.is_id)
    }

    /// Check whether any column is a primary-key member.
    #[must_use]
    pub fn has_ids(&self) -> bool {
        self.ids().next().is_some()
    }

    /// Optimistic-lock column.
    #[must_use]
    pub fn version(&self) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.definition.is_version)
    }

    /// Quoted, schema-qualified table reference.
    #[must_use]
    pub fn table_ref(&self, config: &Config) -> String {
        config.table_ref(self.schema.as_deref(), &self.name)
    }

    /// Table name as shown in check messages, `schema.table` when a schema
    /// is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone()
        }
    }
}
