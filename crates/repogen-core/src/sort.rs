// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime sort clauses.
//!
//! A repository method taking an [`Order`] parameter gets
//! [`ORDER_BY_MARKER`] in its generated SQL instead of a static clause. At
//! execution time the generated code calls [`Order::substitute`] with the
//! entity's field-to-column table, which replaces the marker with the
//! rendered `ORDER BY` clause (or removes it when the order is empty).
//!
//! # Example
//!
//! ```rust
//! use repogen_core::{NullsOrder, Order};
//!
//! const COLUMNS: &[(&str, &str)] = &[("name", "\"name\""), ("birth_date", "\"birth_date\"")];
//!
//! let order = Order::asc("birth_date").nulls(NullsOrder::First).then_desc("name");
//! let sql = order
//!     .substitute("SELECT \"name\" FROM \"person\" %orderBy LIMIT ?", COLUMNS)
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT \"name\" FROM \"person\" ORDER BY \"birth_date\" ASC NULLS FIRST, \"name\" DESC LIMIT ?"
//! );
//! ```

use crate::RepositoryError;

/// Marker left in generated SQL where a runtime `ORDER BY` clause goes.
pub const ORDER_BY_MARKER: &str = "%orderBy";

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,

    /// Descending order (Z-A, 9-0, newest first).
    Desc
}

impl SortDirection {
    /// Convert to SQL keyword.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }
}

/// Placement of NULL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullsOrder {
    /// Database default (PostgreSQL: last for ASC, first for DESC).
    #[default]
    Default,

    /// `NULLS FIRST`
    First,

    /// `NULLS LAST`
    Last
}

impl NullsOrder {
    /// SQL suffix including the leading space, empty for the default.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::First => " NULLS FIRST",
            Self::Last => " NULLS LAST"
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// Entity field path, dot separated for nested fields.
    pub field: String,

    /// Sort direction.
    pub direction: SortDirection,

    /// NULL placement.
    pub nulls: NullsOrder
}

/// Ordered list of sort keys passed to a repository method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    /// Sort keys, most significant first.
    pub orders: Vec<SortOrder>
}

impl Order {
    /// An order without sort keys; renders to nothing.
    pub const fn unsorted() -> Self {
        Self {
            orders: Vec::new()
        }
    }

    /// Sort ascending by one field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::unsorted().then(field, SortDirection::Asc)
    }

    /// Sort descending by one field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::unsorted().then(field, SortDirection::Desc)
    }

    /// Append a sort key.
    #[must_use]
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(SortOrder {
            field: field.into(),
            direction,
            nulls: NullsOrder::Default
        });
        self
    }

    /// Append an ascending sort key.
    #[must_use]
    pub fn then_asc(self, field: impl Into<String>) -> Self {
        self.then(field, SortDirection::Asc)
    }

    /// Append a descending sort key.
    #[must_use]
    pub fn then_desc(self, field: impl Into<String>) -> Self {
        self.then(field, SortDirection::Desc)
    }

    /// Set NULL placement of the last sort key.
    #[must_use]
    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        if let Some(last) = self.orders.last_mut() {
            last.nulls = nulls;
        }
        self
    }

    /// Render the `ORDER BY` clause.
    ///
    /// `columns` maps entity field paths to SQL column expressions. Returns
    /// an empty string for an unsorted order.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::UnknownSortField`] when a key names an unmapped
    /// field.
    pub fn render(&self, columns: &[(&str, &str)]) -> Result<String, RepositoryError> {
        if self.orders.is_empty() {
            return Ok(String::new());
        }

        let keys = self
            .orders
            .iter()
            .map(|order| {
                let column = columns
                    .iter()
                    .find(|(field, _)| *field == order.field)
                    .map(|(_, column)| *column)
                    .ok_or_else(|| RepositoryError::UnknownSortField(order.field.clone()))?;
                Ok(format!(
                    "{} {}{}",
                    column,
                    order.direction.as_sql(),
                    order.nulls.as_sql()
                ))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(format!("ORDER BY {}", keys.join(", ")))
    }

    /// Replace [`ORDER_BY_MARKER`] in generated SQL with the rendered clause.
    ///
    /// An unsorted order removes the marker together with the space before
    /// it.
    ///
    /// # Errors
    ///
    /// See [`Order::render`].
    pub fn substitute(&self, sql: &str, columns: &[(&str, &str)]) -> Result<String, RepositoryError> {
        let clause = self.render(columns)?;
        if clause.is_empty() {
            let spaced = format!(" {ORDER_BY_MARKER}");
            if sql.contains(&spaced) {
                return Ok(sql.replacen(&spaced, "", 1));
            }
            return Ok(sql.replacen(ORDER_BY_MARKER, "", 1));
        }
        Ok(sql.replacen(ORDER_BY_MARKER, &clause, 1))
    }
}
