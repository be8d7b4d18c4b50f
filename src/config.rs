// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compilation options.
//!
//! A [`Config`] is passed to [`Compiler::new`](crate::Compiler::new) and
//! read by every stage; there is no process-wide state.
//!
//! | Option | Default | Effect |
//! |--------|---------|--------|
//! | `placeholders` | `question` | `?` or `$n` bind markers |
//! | `default_schema` | none | Schema for entities that declare none |
//! | `quote_identifiers` | `true` | Wrap table and column names in `"…"` |
//! | `single_result_cap` | `2` | LIMIT appended to single-result SELECTs |
//! | `default_database` | `"main"` | Aggregate for repositories naming none |
//!
//! `Config` deserializes with serde, so build scripts can keep it in a file:
//!
//! ```rust,ignore
//! let config: repogen::Config = toml::from_str(&std::fs::read_to_string("repogen.toml")?)?;
//! ```

use serde::{Deserialize, Serialize};

/// Bind marker syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// Positional `?`; one marker per bind slot.
    #[default]
    Question,

    /// PostgreSQL `$1, $2, ...`; a repeated named parameter reuses its
    /// index.
    Numbered
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind marker syntax.
    pub placeholders: PlaceholderStyle,

    /// Schema used when neither repository nor entity names one.
    pub default_schema: Option<String>,

    /// Quote table and column identifiers.
    pub quote_identifiers: bool,

    /// LIMIT for single-result SELECTs.
    pub single_result_cap: u32,

    /// Aggregate name for repositories whose marker names no database.
    pub default_database: String
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholders:      PlaceholderStyle::Question,
            default_schema:    None,
            quote_identifiers: true,
            single_result_cap: 2,
            default_database:  "main".to_string()
        }
    }
}

impl Config {
    /// Render an identifier for SQL text.
    #[must_use]
    pub fn quote(&self, ident: &str) -> String {
        if self.quote_identifiers {
            format!("\"{}\"", ident.replace('"', "\"\""))
        } else {
            ident.to_string()
        }
    }

    /// Render a possibly schema-qualified table reference.
    #[must_use]
    pub fn table_ref(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(table)),
            None => self.quote(table)
        }
    }
}
