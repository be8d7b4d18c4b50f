// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime contracts for repositories generated by repogen.
//!
//! Generated repository code links against this crate only. Everything the
//! generated methods need at execution time lives here, while the mapping
//! engine itself (the `repogen` crate) is a build-time dependency.
//!
//! # Overview
//!
//! - [`Repository`] — Base capability set of every generated repository
//! - [`RepositoryError`] — Not-found, too-many-results and optimistic-lock
//!   failures
//! - [`Pageable`] / [`Page`] — Offset pagination
//! - [`Order`] — Runtime sort clauses substituted into generated SQL
//! - [`result`] — Single-result extraction and affected-row verification
//! - [`retry`] — Explicit retry helper for optimistic-lock conflicts
//! - [`transaction`] — Commit/rollback wrapper with isolation levels
//! - [`check`] — Schema discrepancy rules used by `check()`
//!
//! # Usage
//!
//! ```rust,ignore
//! use repogen_core::prelude::*;
//!
//! #[async_trait]
//! impl Repository<Person> for PersonRepositoryImpl {
//!     type Error = RepositoryError;
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod check;
mod db_type;
mod error;
mod page;
pub mod prelude;
pub mod result;
pub mod retry;
mod sort;
pub mod transaction;

/// Re-export async_trait for generated code.
pub use async_trait::async_trait;
pub use db_type::DbType;
pub use error::RepositoryError;
pub use page::{Page, Pageable};
pub use sort::{NullsOrder, ORDER_BY_MARKER, Order, SortDirection, SortOrder};

/// Base repository trait.
///
/// Every generated `{Entity}Repository` exposes these operations in addition
/// to the methods declared on the repository interface. They are synthesized
/// by the generator when the interface does not declare them itself.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl Repository<Person> for PersonRepositoryImpl<'_> {
///     type Error = RepositoryError;
///
///     async fn save(&self, item: &Person) -> Result<(), Self::Error> { /* ... */ }
///     async fn save_all(&self, items: &[Person]) -> Result<(), Self::Error> { /* ... */ }
///     async fn find_all(&self) -> Result<Vec<Person>, Self::Error> { /* ... */ }
///     async fn delete_all(&self) -> Result<(), Self::Error> { /* ... */ }
///     async fn check(&self) -> Result<Vec<String>, Self::Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    /// Error type for repository operations.
    ///
    /// Must implement `std::error::Error + Send + Sync` for async
    /// compatibility.
    type Error: std::error::Error + Send + Sync;

    /// Insert or update one entity.
    ///
    /// Version-guarded entities fail with
    /// [`RepositoryError::OptimisticLock`] when the stored version moved on.
    async fn save(&self, item: &T) -> Result<(), Self::Error>;

    /// Insert or update many entities in one batched execution.
    async fn save_all(&self, items: &[T]) -> Result<(), Self::Error>;

    /// Load every row of the table.
    async fn find_all(&self) -> Result<Vec<T>, Self::Error>;

    /// Delete every row of the table.
    async fn delete_all(&self) -> Result<(), Self::Error>;

    /// Compare the live table against the mapped columns.
    ///
    /// Returns one human-readable message per discrepancy category; an empty
    /// list means the schema matches.
    async fn check(&self) -> Result<Vec<String>, Self::Error>;
}
