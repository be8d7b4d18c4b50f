// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for generated code.
//!
//! # Usage
//!
//! ```rust,ignore
//! use repogen_core::prelude::*;
//! ```

pub use crate::{
    DbType, NullsOrder, ORDER_BY_MARKER, Order, Page, Pageable, Repository, RepositoryError,
    SortDirection, SortOrder, async_trait,
    result::{single, single_required, verify_affected, verify_batch_affected},
    retry::retry,
    transaction::{IsolationLevel, TransactionConfig, TransactionError, TransactionManager}
};
