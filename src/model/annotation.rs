// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotations attached to classes, fields, functions and parameters.
//!
//! An [`Annotation`] is a name plus a string-keyed parameter map. The names
//! the engine reacts to are collected in [`names`]; anything else is carried
//! along untouched.
//!
//! | Annotation | Target | Parameters |
//! |------------|--------|------------|
//! | `Id` | field | |
//! | `Version` | field | |
//! | `Column` | field | `name`, `type`, `schema` |
//! | `Table` | entity, repository | `name`, `schema` |
//! | `Repository` | repository | `database` |
//! | `Where` | function | `value` |
//! | `Query` / `Statement` | function | `value` |
//! | `Limit` | function (`value`) or parameter | `value` |
//! | `First` | function | |
//! | `OrderBy` | function | `value` |
//! | `Delete` / `Save` / `OnConflictFail` | function | |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recognized annotation names.
pub mod names {
    /// Primary-key column.
    pub const ID: &str = "Id";
    /// Optimistic-lock counter.
    pub const VERSION: &str = "Version";
    /// Column name/type override.
    pub const COLUMN: &str = "Column";
    /// Table name/schema marker.
    pub const TABLE: &str = "Table";
    /// Repository marker naming its database aggregate.
    pub const REPOSITORY: &str = "Repository";
    /// Custom WHERE condition.
    pub const WHERE: &str = "Where";
    /// Custom row-returning SQL.
    pub const QUERY: &str = "Query";
    /// Custom non-returning SQL.
    pub const STATEMENT: &str = "Statement";
    /// Literal or parameter-bound LIMIT.
    pub const LIMIT: &str = "Limit";
    /// `LIMIT 1` without multiplicity check.
    pub const FIRST: &str = "First";
    /// Static ORDER BY clause.
    pub const ORDER_BY: &str = "OrderBy";
    /// Force the delete archetype.
    pub const DELETE: &str = "Delete";
    /// Force the save archetype.
    pub const SAVE: &str = "Save";
    /// Plain INSERT instead of upsert.
    pub const ON_CONFLICT_FAIL: &str = "OnConflictFail";
}

/// Key of the single-value parameter (`Where("…")`, `Limit(10)`).
pub const VALUE: &str = "value";

/// Annotation instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name, e.g. `Column`.
    pub name: String,

    /// Parameters by key.
    #[serde(default)]
    pub params: BTreeMap<String, String>
}

impl Annotation {
    /// Create an annotation without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            params: BTreeMap::new()
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Create an annotation holding a single `value` parameter.
    pub fn valued(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name).with(VALUE, value)
    }

    /// Get a parameter, treating empty strings as absent.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Get the `value` parameter.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.param(VALUE)
    }
}

/// Lookup helpers for anything carrying annotations.
pub trait Annotated {
    /// All annotations in declaration order.
    fn annotations(&self) -> &[Annotation];

    /// First annotation with the given name.
    fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.name == name)
    }

    /// Check whether an annotation is present.
    fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

/// Parsed `Column(name, type, schema)` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAnnotation {
    /// Explicit column name.
    pub name: Option<String>,

    /// Explicit database type.
    pub db_type: Option<String>,

    /// Schema parameter; accepted, not used for column placement.
    pub schema: Option<String>
}

impl ColumnAnnotation {
    /// Read the `Column` annotation of a field, if any.
    pub fn of(target: &impl Annotated) -> Self {
        target
            .annotation(names::COLUMN)
            .map(|a| Self {
                name:    a.param("name").map(str::to_string),
                db_type: a.param("type").map(str::to_string),
                schema:  a.param("schema").map(str::to_string)
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Target(Vec<Annotation>);

    impl Annotated for Target {
        fn annotations(&self) -> &[Annotation] {
            &self.0
        }
    }

    #[test]
    fn empty_params_are_absent() {
        let a = Annotation::new(names::COLUMN).with("name", "").with("type", "TEXT");
        assert_eq!(a.param("name"), None);
        assert_eq!(a.param("type"), Some("TEXT"));
    }

    #[test]
    fn column_annotation_reads_params() {
        let target = Target(vec![
            Annotation::new(names::ID),
            Annotation::new(names::COLUMN).with("name", "cap_city"),
        ]);
        let column = ColumnAnnotation::of(&target);
        assert_eq!(column.name.as_deref(), Some("cap_city"));
        assert_eq!(column.db_type, None);
        assert!(target.has_annotation(names::ID));
        assert!(!target.has_annotation(names::VERSION));
    }

    #[test]
    fn valued_annotation() {
        let a = Annotation::valued(names::WHERE, "age > :min");
        assert_eq!(a.value(), Some("age > :min"));
    }
}
