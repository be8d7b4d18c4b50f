// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL column types.
//!
//! Shared between the generator, which assigns a [`DbType`] to every mapped
//! column, and the generated `check()` routine, which resolves the
//! `information_schema.columns.data_type` strings of the live table back
//! into the same enum before comparing.
//!
//! # Spellings
//!
//! | DbType | Canonical | Also accepted |
//! |--------|-----------|---------------|
//! | `Boolean` | `BOOLEAN` | `bool` |
//! | `SmallInt` | `SMALLINT` | `int2` |
//! | `Integer` | `INTEGER` | `int`, `int4` |
//! | `BigInt` | `BIGINT` | `int8` |
//! | `Real` | `REAL` | `float4` |
//! | `DoublePrecision` | `DOUBLE PRECISION` | `float8` |
//! | `Numeric` | `NUMERIC` | `decimal` |
//! | `Text` | `TEXT` | `varchar`, `character varying`, `character` |
//! | `Bytea` | `BYTEA` | |
//! | `Date` | `DATE` | |
//! | `Time` | `TIME` | `time without time zone` |
//! | `Timestamp` | `TIMESTAMP` | `timestamp without time zone` |
//! | `TimestampTz` | `TIMESTAMPTZ` | `timestamp with time zone` |
//! | `Uuid` | `UUID` | |
//! | `Jsonb` | `JSONB` | |

use std::fmt;

/// Database column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DbType {
    /// `BOOLEAN`
    Boolean,
    /// `SMALLINT`
    SmallInt,
    /// `INTEGER`
    Integer,
    /// `BIGINT`
    BigInt,
    /// `REAL`
    Real,
    /// `DOUBLE PRECISION`
    DoublePrecision,
    /// `NUMERIC`
    Numeric,
    /// `TEXT`
    Text,
    /// `BYTEA`
    Bytea,
    /// `DATE`
    Date,
    /// `TIME`
    Time,
    /// `TIMESTAMP`
    Timestamp,
    /// `TIMESTAMPTZ`
    TimestampTz,
    /// `UUID`
    Uuid,
    /// `JSONB`
    Jsonb,
    /// Any other type, kept in upper case (e.g. `CITEXT`).
    Other(String)
}

impl DbType {
    /// Resolve a type name as written in DDL or reported by
    /// `information_schema`.
    ///
    /// Matching is case-insensitive; unknown names become
    /// [`DbType::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "boolean" | "bool" => Self::Boolean,
            "smallint" | "int2" => Self::SmallInt,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::BigInt,
            "real" | "float4" => Self::Real,
            "double precision" | "float8" => Self::DoublePrecision,
            "numeric" | "decimal" => Self::Numeric,
            "text" | "varchar" | "character varying" | "character" | "char" => Self::Text,
            "bytea" => Self::Bytea,
            "date" => Self::Date,
            "time" | "time without time zone" => Self::Time,
            "timestamp" | "timestamp without time zone" => Self::Timestamp,
            "timestamptz" | "timestamp with time zone" => Self::TimestampTz,
            "uuid" => Self::Uuid,
            "jsonb" => Self::Jsonb,
            _ => Self::Other(normalized.to_uppercase())
        }
    }

    /// Canonical SQL spelling.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::DoublePrecision => "DOUBLE PRECISION",
            Self::Numeric => "NUMERIC",
            Self::Text => "TEXT",
            Self::Bytea => "BYTEA",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampTz => "TIMESTAMPTZ",
            Self::Uuid => "UUID",
            Self::Jsonb => "JSONB",
            Self::Other(name) => name
        }
    }

    /// Whether values of this type are marshalled through a JSON codec.
    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Jsonb)
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
