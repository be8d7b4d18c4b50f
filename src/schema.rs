// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema validation routine of a repository.
//!
//! A [`SchemaCheck`] is everything the generated `check()` needs: the
//! columns the mapping expects and the `information_schema` query that
//! loads the live ones. Comparison itself lives in
//! [`repogen_core::check`] so generated code and the engine share one set
//! of rules.
//!
//! The query returns one row per live column:
//!
//! | # | Column | Type |
//! |---|--------|------|
//! | 1 | `column_name` | text |
//! | 2 | `is_nullable` | `YES` / `NO` |
//! | 3 | `data_type` | text, resolved by [`DbType::parse`](repogen_core::DbType::parse) |
//! | 4 | `is_key` | boolean, primary-key membership |

use repogen_core::{DbType, check::ColumnSpec};

use crate::{
    Config,
    mapping::TableMapping,
    model::Type,
    query::{QueryParameter, binder::Binder}
};

/// Expected columns and live-column query of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheck {
    /// Unquoted table name.
    pub table: String,

    /// Schema, `None` for the connection's current schema.
    pub schema: Option<String>,

    /// Table name used in messages.
    pub display_name: String,

    /// Columns in mapping order.
    pub expected: Vec<ColumnSpec>,

    /// `information_schema` query.
    pub query: String,

    /// Binds of [`query`](Self::query): table name, then schema.
    pub query_parameters: Vec<QueryParameter>
}

impl SchemaCheck {
    /// Build the check of `mapping`.
    #[must_use]
    pub fn new(mapping: &TableMapping, config: &Config) -> Self {
        let expected = mapping
            .columns
            .iter()
            .map(|c| {
                ColumnSpec::new(
                    c.name(),
                    c.definition.db_type.clone(),
                    c.definition.nullable,
                    c.definition.is_id
                )
            })
            .collect();

        let mut binder = Binder::new(config.placeholders);
        let table = binder.bind_named(
            "table",
            QueryParameter::new(vec!["table".to_string()], Type::named("String"), Some(DbType::Text))
        );
        let schema = binder.bind_named(
            "schema",
            QueryParameter::new(
                vec!["schema".to_string()],
                Type::named("String").nullable(),
                Some(DbType::Text)
            )
        );
        let query = format!(
            "SELECT c.column_name, c.is_nullable, c.data_type, EXISTS (\
             SELECT 1 FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage k \
             ON k.constraint_name = tc.constraint_name AND k.table_schema = tc.table_schema \
             AND k.table_name = tc.table_name \
             WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = c.table_schema \
             AND tc.table_name = c.table_name AND k.column_name = c.column_name) AS is_key \
             FROM information_schema.columns c \
             WHERE c.table_name = {table} AND c.table_schema = COALESCE({schema}, current_schema()) \
             ORDER BY c.ordinal_position"
        );

        Self {
            table: mapping.name.clone(),
            schema: mapping.schema.clone(),
            display_name: mapping.display_name(),
            expected,
            query,
            query_parameters: binder.finish()
        }
    }

    /// Discrepancy messages against the live columns; empty when valid.
    #[must_use]
    pub fn evaluate(&self, live: &[ColumnSpec]) -> Vec<String> {
        repogen_core::check::messages(&self.display_name, &self.expected, live)
    }
}
