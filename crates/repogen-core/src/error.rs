// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Failure signals raised by generated repository code.
//!
//! Only three failure kinds originate in generated code; everything the
//! driver reports passes through [`RepositoryError::Database`] unchanged.

use thiserror::Error;

/// Error type for generated repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A non-nullable single-result query matched no rows.
    #[error("no row matched a query that requires exactly one result")]
    NotFound,

    /// A single-result query matched more than one row.
    #[error("more than one row matched a query that expects a single result")]
    TooManyResults,

    /// A version-guarded write affected a different number of rows than
    /// expected.
    #[error("optimistic lock failure: expected {expected} affected rows, got {actual}")]
    OptimisticLock {
        /// Rows that had to be affected.
        expected: u64,
        /// Rows actually affected.
        actual:   u64
    },

    /// A runtime sort clause named a field the entity does not map.
    #[error("cannot sort by unknown field `{0}`")]
    UnknownSortField(String),

    /// Driver or constraint error, propagated as-is.
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>)
}

impl RepositoryError {
    /// Wrap a driver error.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Box::new(err))
    }

    /// Check if this is a not-found failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is a too-many-results failure.
    #[must_use]
    pub const fn is_too_many_results(&self) -> bool {
        matches!(self, Self::TooManyResults)
    }

    /// Check if this is an optimistic-lock failure.
    ///
    /// Pass this as the predicate to [`crate::retry::retry`] to retry
    /// stale writes.
    #[must_use]
    pub const fn is_optimistic_lock(&self) -> bool {
        matches!(self, Self::OptimisticLock { .. })
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(Box::new(err))
    }
}
