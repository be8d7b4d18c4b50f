// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema discrepancy rules.
//!
//! The generated `check()` method loads the live columns of its table from
//! `information_schema` and hands them, together with the columns the
//! generator expected, to [`compare`]. The result lists one
//! [`Discrepancy`] per mismatch category; an empty list means the live
//! table matches the mapping.
//!
//! # Categories
//!
//! Reported in this order:
//!
//! | Category | Columns listed |
//! |----------|----------------|
//! | Missing table | none; no other category is checked |
//! | Missing columns | expected, absent from the live table |
//! | Extra columns | live, absent from the mapping |
//! | Invalid nullability | expected, nullability differs |
//! | Invalid type | expected, type differs |
//! | Extra keys | live primary-key columns the mapping does not mark as id |
//! | Missing keys | id columns that are not part of the live primary key |
//!
//! # Message format
//!
//! ```text
//! Missing columns: table person (age INTEGER not null, nickname TEXT)
//! ```

use std::fmt;

use crate::DbType;

/// One column as expected by the mapping or as found in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Unquoted column name.
    pub name: String,

    /// Column type.
    pub db_type: DbType,

    /// Whether the column accepts NULL.
    pub nullable: bool,

    /// Whether the column belongs to the primary key.
    pub is_key: bool
}

impl ColumnSpec {
    /// Create a column description.
    pub fn new(name: impl Into<String>, db_type: DbType, nullable: bool, is_key: bool) -> Self {
        Self {
            name: name.into(),
            db_type,
            nullable,
            is_key
        }
    }

    /// Build a live column from one `information_schema` row.
    ///
    /// `is_nullable` is the `YES`/`NO` string of
    /// `information_schema.columns.is_nullable`.
    pub fn from_information_schema(
        name: impl Into<String>,
        is_nullable: &str,
        data_type: &str,
        is_key: bool
    ) -> Self {
        Self {
            name: name.into(),
            db_type: DbType::parse(data_type),
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
            is_key
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.db_type)?;
        if !self.nullable {
            f.write_str(" not null")?;
        }
        Ok(())
    }
}

/// Mismatch category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    /// The table does not exist.
    MissingTable,
    /// Expected columns absent from the live table.
    MissingColumns,
    /// Live columns absent from the mapping.
    ExtraColumns,
    /// Nullability differs.
    InvalidNullability,
    /// Type differs.
    InvalidType,
    /// Live key columns not mapped as id.
    ExtraKeys,
    /// Mapped id columns not in the live key.
    MissingKeys
}

impl Category {
    /// Message prefix.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingTable => "Missing table",
            Self::MissingColumns => "Missing columns",
            Self::ExtraColumns => "Extra columns",
            Self::InvalidNullability => "Invalid nullability",
            Self::InvalidType => "Invalid type",
            Self::ExtraKeys => "Extra keys",
            Self::MissingKeys => "Missing keys"
        }
    }
}

/// One category of mismatch between mapping and live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    /// Mismatch category.
    pub category: Category,

    /// Table name as reported in the message.
    pub table: String,

    /// Offending columns, empty for [`Category::MissingTable`].
    pub columns: Vec<ColumnSpec>
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: table {}", self.category.label(), self.table)?;
        if self.columns.is_empty() {
            return Ok(());
        }
        let columns = self
            .columns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, " ({columns})")
    }
}

/// Compare expected columns with the live columns of `table`.
///
/// An empty `live` slice means the table does not exist.
pub fn compare(table: &str, expected: &[ColumnSpec], live: &[ColumnSpec]) -> Vec<Discrepancy> {
    if live.is_empty() {
        return vec![Discrepancy {
            category: Category::MissingTable,
            table:    table.to_string(),
            columns:  Vec::new()
        }];
    }

    let find = |columns: &[ColumnSpec], name: &str| -> Option<ColumnSpec> {
        columns.iter().find(|c| c.name == name).cloned()
    };
    let pairs: Vec<(&ColumnSpec, ColumnSpec)> = expected
        .iter()
        .filter_map(|e| find(live, &e.name).map(|l| (e, l)))
        .collect();

    let buckets = [
        (
            Category::MissingColumns,
            expected
                .iter()
                .filter(|e| find(live, &e.name).is_none())
                .cloned()
                .collect::<Vec<_>>()
        ),
        (
            Category::ExtraColumns,
            live.iter()
                .filter(|l| find(expected, &l.name).is_none())
                .cloned()
                .collect()
        ),
        (
            Category::InvalidNullability,
            pairs
                .iter()
                .filter(|(e, l)| e.nullable != l.nullable)
                .map(|(e, _)| (*e).clone())
                .collect()
        ),
        (
            Category::InvalidType,
            pairs
                .iter()
                .filter(|(e, l)| e.db_type != l.db_type)
                .map(|(e, _)| (*e).clone())
                .collect()
        ),
        (
            Category::ExtraKeys,
            live.iter()
                .filter(|l| l.is_key && !find(expected, &l.name).is_some_and(|e| e.is_key))
                .cloned()
                .collect()
        ),
        (
            Category::MissingKeys,
            expected
                .iter()
                .filter(|e| e.is_key && !find(live, &e.name).is_some_and(|l| l.is_key))
                .cloned()
                .collect()
        )
    ];

    buckets
        .into_iter()
        .filter(|(_, columns)| !columns.is_empty())
        .map(|(category, columns)| Discrepancy {
            category,
            table: table.to_string(),
            columns
        })
        .collect()
}

/// Render [`compare`] as the message list returned by `check()`.
pub fn messages(table: &str, expected: &[ColumnSpec], live: &[ColumnSpec]) -> Vec<String> {
    let discrepancies = compare(table, expected, live);
    if !discrepancies.is_empty() {
        tracing::debug!(table, count = discrepancies.len(), "schema discrepancies found");
    }
    discrepancies.iter().map(ToString::to_string).collect()
}

/// Join check messages into one line.
pub fn join(messages: &[String]) -> String {
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expected() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", DbType::Uuid, false, true),
            ColumnSpec::new("name", DbType::Text, false, false),
            ColumnSpec::new("age", DbType::Integer, true, false),
        ]
    }

    #[test]
    fn matching_table_is_valid() {
        let live = expected();
        assert!(compare("person", &expected(), &live).is_empty());
    }

    #[test]
    fn missing_table_short_circuits() {
        assert_eq!(
            messages("person", &expected(), &[]),
            vec!["Missing table: table person".to_string()]
        );
    }

    #[test]
    fn missing_and_extra_columns_in_order() {
        let live = vec![
            ColumnSpec::new("id", DbType::Uuid, false, true),
            ColumnSpec::new("name", DbType::Text, false, false),
            ColumnSpec::new("nickname", DbType::Text, true, false),
        ];
        assert_eq!(
            messages("person", &expected(), &live),
            vec![
                "Missing columns: table person (age INTEGER)".to_string(),
                "Extra columns: table person (nickname TEXT)".to_string(),
            ]
        );
    }

    #[test]
    fn nullability_and_type_mismatch() {
        let live = vec![
            ColumnSpec::from_information_schema("id", "NO", "uuid", true),
            ColumnSpec::from_information_schema("name", "YES", "text", false),
            ColumnSpec::from_information_schema("age", "YES", "bigint", false),
        ];
        assert_eq!(
            messages("person", &expected(), &live),
            vec![
                "Invalid nullability: table person (name TEXT not null)".to_string(),
                "Invalid type: table person (age INTEGER)".to_string(),
            ]
        );
    }

    #[test]
    fn key_mismatch_both_ways() {
        let live = vec![
            ColumnSpec::new("id", DbType::Uuid, false, false),
            ColumnSpec::new("name", DbType::Text, false, true),
            ColumnSpec::new("age", DbType::Integer, true, false),
        ];
        assert_eq!(
            messages("person", &expected(), &live),
            vec![
                "Extra keys: table person (name TEXT not null)".to_string(),
                "Missing keys: table person (id UUID not null)".to_string(),
            ]
        );
    }

    #[test]
    fn information_schema_spellings_resolve() {
        let column =
            ColumnSpec::from_information_schema("at", "NO", "timestamp with time zone", false);
        assert_eq!(column.db_type, DbType::TimestampTz);
        assert!(!column.nullable);
    }

    #[test]
    fn join_uses_semicolons() {
        let joined = join(&["Missing columns: table t (a TEXT)".into(), "Extra keys: table t (b TEXT)".into()]);
        assert_eq!(joined, "Missing columns: table t (a TEXT); Extra keys: table t (b TEXT)");
    }
}
