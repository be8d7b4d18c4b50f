// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transaction support for generated repositories.
//!
//! Generated repository methods never open transactions themselves; they run
//! on whatever connection they are handed. [`TransactionManager`] is the
//! wrapper callers use to group several repository calls into one unit of
//! work with automatic commit/rollback semantics.
//!
//! # Overview
//!
//! - [`TransactionManager`] — Entry point, configured with isolation level
//!   and access mode
//! - [`TransactionContext`] — Active transaction handed to the unit of work
//! - [`TransactionError`] — Error wrapper for begin/commit/rollback failures
//! - [`Transactional`] / [`TransactionOps`] — Seams implemented per driver
//!
//! # Semantics
//!
//! | Outcome of the unit of work | Action |
//! |-----------------------------|--------|
//! | `Ok` | commit |
//! | `Ok` after [`TransactionContext::set_rollback_only`] | rollback, value returned |
//! | `Err` | rollback, error returned |
//!
//! Transactions are read-write unless configured otherwise; auto-commit is
//! off for their whole duration.
//!
//! # Example
//!
//! ```rust,ignore
//! use repogen_core::prelude::*;
//!
//! TransactionManager::new(&pool)
//!     .isolation(IsolationLevel::Serializable)
//!     .run(|ctx| Box::pin(async move {
//!         let repo = PersonRepositoryImpl::new(ctx.transaction());
//!         repo.save(&person).await
//!     }))
//!     .await?;
//! ```

use std::error::Error as StdError;

use futures::future::BoxFuture;
use thiserror::Error;

/// SQL transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    /// `READ UNCOMMITTED`
    ReadUncommitted,

    /// `READ COMMITTED`
    ReadCommitted,

    /// `REPEATABLE READ`
    RepeatableRead,

    /// `SERIALIZABLE`
    Serializable
}

impl IsolationLevel {
    /// Convert to SQL keywords.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE"
        }
    }
}

/// Options applied when a transaction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionConfig {
    /// Isolation level; `None` keeps the server default.
    pub isolation: Option<IsolationLevel>,

    /// Open the transaction in read-only mode.
    pub read_only: bool
}

impl TransactionConfig {
    /// `SET TRANSACTION` statement to run right after `BEGIN`.
    ///
    /// Returns `None` when the configuration matches the server defaults
    /// (default isolation, read-write).
    #[must_use]
    pub fn set_statement(&self) -> Option<String> {
        if self.isolation.is_none() && !self.read_only {
            return None;
        }

        let mut modes = Vec::with_capacity(2);
        if let Some(level) = self.isolation {
            modes.push(format!("ISOLATION LEVEL {}", level.as_sql()));
        }
        modes.push(if self.read_only { "READ ONLY" } else { "READ WRITE" }.to_string());

        Some(format!("SET TRANSACTION {}", modes.join(", ")))
    }
}

/// Error type for transaction operations.
///
/// Wraps database errors and records which step of the transaction
/// lifecycle failed.
#[derive(Debug, Error)]
pub enum TransactionError<E: StdError + 'static> {
    /// Failed to begin transaction.
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] E),

    /// Failed to commit transaction.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] E),

    /// Failed to rollback transaction.
    #[error("failed to rollback transaction: {0}")]
    Rollback(#[source] E)
}

impl<E: StdError + 'static> TransactionError<E> {
    /// Check if this is a begin error.
    pub const fn is_begin(&self) -> bool {
        matches!(self, Self::Begin(_))
    }

    /// Check if this is a commit error.
    pub const fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }

    /// Check if this is a rollback error.
    pub const fn is_rollback(&self) -> bool {
        matches!(self, Self::Rollback(_))
    }

    /// Get the inner error.
    pub fn into_inner(self) -> E {
        match self {
            Self::Begin(e) | Self::Commit(e) | Self::Rollback(e) => e
        }
    }
}

/// Trait for types that can begin a transaction.
///
/// Implemented for database pools to enable transaction creation.
#[allow(async_fn_in_trait)]
pub trait Transactional: Sized + Send + Sync {
    /// Transaction type.
    type Transaction<'t>: TransactionOps<Error = Self::Error>
    where
        Self: 't;

    /// Error type for transaction operations.
    type Error: StdError + Send + Sync + 'static;

    /// Begin a new transaction with the given options.
    async fn begin(&self, config: &TransactionConfig) -> Result<Self::Transaction<'_>, Self::Error>;
}

/// Trait for transaction types that can be committed or rolled back.
#[allow(async_fn_in_trait)]
pub trait TransactionOps: Sized + Send {
    /// Error type.
    type Error: StdError + Send + Sync + 'static;

    /// Commit the transaction.
    async fn commit(self) -> Result<(), Self::Error>;

    /// Rollback the transaction.
    async fn rollback(self) -> Result<(), Self::Error>;
}

/// Active transaction handed to a unit of work.
pub struct TransactionContext<Tx> {
    tx:            Tx,
    rollback_only: bool
}

impl<Tx> TransactionContext<Tx> {
    /// Create a new transaction context.
    #[doc(hidden)]
    pub const fn new(tx: Tx) -> Self {
        Self {
            tx,
            rollback_only: false
        }
    }

    /// Get mutable reference to the underlying transaction.
    ///
    /// Generated repositories are constructed on top of this.
    pub fn transaction(&mut self) -> &mut Tx {
        &mut self.tx
    }

    /// Request a rollback even if the unit of work succeeds.
    pub fn set_rollback_only(&mut self) {
        self.rollback_only = true;
    }

    /// Check whether a rollback was requested.
    pub const fn is_rollback_only(&self) -> bool {
        self.rollback_only
    }
}

/// Transaction builder and runner.
///
/// Use [`TransactionManager::new`] to create a runner, chain the
/// configuration methods, then call [`TransactionManager::run`].
pub struct TransactionManager<'p, DB> {
    pool:   &'p DB,
    config: TransactionConfig
}

impl<'p, DB: Transactional> TransactionManager<'p, DB> {
    /// Create a read-write transaction runner with default isolation.
    pub const fn new(pool: &'p DB) -> Self {
        Self {
            pool,
            config: TransactionConfig {
                isolation: None,
                read_only: false
            }
        }
    }

    /// Set the isolation level.
    #[must_use]
    pub const fn isolation(mut self, level: IsolationLevel) -> Self {
        self.config.isolation = Some(level);
        self
    }

    /// Open the transaction read-only.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Get the effective configuration.
    pub const fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Execute a unit of work within a transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err` or when the unit of work called
    /// [`TransactionContext::set_rollback_only`]. A failed rollback after
    /// an `Err` is logged and the original error is returned.
    ///
    /// # Errors
    ///
    /// The unit of work's error, or [`TransactionError`] converted into `E`
    /// when begin, commit or an explicit rollback fails.
    pub async fn run<F, T, E>(self, f: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(
            &'c mut TransactionContext<DB::Transaction<'p>>
        ) -> BoxFuture<'c, Result<T, E>>,
        E: From<TransactionError<DB::Error>>
    {
        let tx = self
            .pool
            .begin(&self.config)
            .await
            .map_err(TransactionError::Begin)?;
        tracing::debug!(config = ?self.config, "transaction started");

        let mut ctx = TransactionContext::new(tx);
        let outcome = f(&mut ctx).await;
        let TransactionContext {
            tx,
            rollback_only
        } = ctx;

        match outcome {
            Ok(value) if rollback_only => {
                tx.rollback().await.map_err(TransactionError::Rollback)?;
                tracing::debug!("transaction rolled back on request");
                Ok(value)
            }
            Ok(value) => {
                tx.commit().await.map_err(TransactionError::Commit)?;
                tracing::debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback after failure failed");
                } else {
                    tracing::debug!("transaction rolled back after failure");
                }
                Err(err)
            }
        }
    }
}

// sqlx implementations
#[cfg(feature = "postgres")]
mod postgres_impl {
    use sqlx::{PgPool, Postgres};

    use super::*;

    impl Transactional for PgPool {
        type Transaction<'t> = sqlx::Transaction<'static, Postgres>;
        type Error = sqlx::Error;

        async fn begin(
            &self,
            config: &TransactionConfig
        ) -> Result<Self::Transaction<'_>, Self::Error> {
            let mut tx = sqlx::pool::Pool::begin(self).await?;
            if let Some(statement) = config.set_statement() {
                sqlx::query(&statement).execute(&mut *tx).await?;
            }
            Ok(tx)
        }
    }

    impl TransactionOps for sqlx::Transaction<'static, Postgres> {
        type Error = sqlx::Error;

        async fn commit(self) -> Result<(), Self::Error> {
            sqlx::Transaction::commit(self).await
        }

        async fn rollback(self) -> Result<(), Self::Error> {
            sqlx::Transaction::rollback(self).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::RepositoryError;

    #[derive(Debug, Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct MockPool {
        journal:       Journal,
        fail_commit:   bool,
        fail_rollback: bool
    }

    impl MockPool {
        fn new() -> Self {
            Self {
                journal:       Journal::default(),
                fail_commit:   false,
                fail_rollback: false
            }
        }
    }

    struct MockTx {
        journal:       Journal,
        fail_commit:   bool,
        fail_rollback: bool
    }

    impl MockTx {
        fn execute(&mut self, sql: &str) {
            self.journal.push(sql);
        }
    }

    impl Transactional for MockPool {
        type Transaction<'t> = MockTx;
        type Error = std::io::Error;

        async fn begin(&self, config: &TransactionConfig) -> Result<MockTx, std::io::Error> {
            self.journal.push("BEGIN");
            if let Some(statement) = config.set_statement() {
                self.journal.push(statement);
            }
            Ok(MockTx {
                journal:       self.journal.clone(),
                fail_commit:   self.fail_commit,
                fail_rollback: self.fail_rollback
            })
        }
    }

    impl TransactionOps for MockTx {
        type Error = std::io::Error;

        async fn commit(self) -> Result<(), std::io::Error> {
            if self.fail_commit {
                return Err(std::io::Error::other("commit refused"));
            }
            self.journal.push("COMMIT");
            Ok(())
        }

        async fn rollback(self) -> Result<(), std::io::Error> {
            if self.fail_rollback {
                return Err(std::io::Error::other("rollback refused"));
            }
            self.journal.push("ROLLBACK");
            Ok(())
        }
    }

    #[derive(Debug)]
    enum AppError {
        Repo(RepositoryError),
        Tx(TransactionError<std::io::Error>)
    }

    impl From<TransactionError<std::io::Error>> for AppError {
        fn from(err: TransactionError<std::io::Error>) -> Self {
            Self::Tx(err)
        }
    }

    #[test]
    fn default_config_needs_no_statement() {
        assert_eq!(TransactionConfig::default().set_statement(), None);
    }

    #[test]
    fn isolation_statement() {
        let config = TransactionConfig {
            isolation: Some(IsolationLevel::Serializable),
            read_only: false
        };
        assert_eq!(
            config.set_statement().as_deref(),
            Some("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE, READ WRITE")
        );
    }

    #[test]
    fn read_only_statement() {
        let config = TransactionConfig {
            isolation: None,
            read_only: true
        };
        assert_eq!(
            config.set_statement().as_deref(),
            Some("SET TRANSACTION READ ONLY")
        );
    }

    #[test]
    fn transaction_error_display() {
        let err: TransactionError<std::io::Error> =
            TransactionError::Commit(std::io::Error::other("commit_err"));
        assert!(err.to_string().contains("commit"));
        assert!(err.to_string().contains("commit_err"));
        assert!(err.is_commit());
        assert!(!err.is_begin());
        assert_eq!(err.into_inner().to_string(), "commit_err");
    }

    #[tokio::test]
    async fn commits_on_success() {
        let pool = MockPool::new();
        let result: Result<i32, AppError> = TransactionManager::new(&pool)
            .run(|ctx| {
                Box::pin(async move {
                    ctx.transaction().execute("INSERT");
                    Ok(7)
                })
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(pool.journal.entries(), vec!["BEGIN", "INSERT", "COMMIT"]);
    }

    #[tokio::test]
    async fn rolls_back_on_error() {
        let pool = MockPool::new();
        let result: Result<(), AppError> = TransactionManager::new(&pool)
            .run(|ctx| {
                Box::pin(async move {
                    ctx.transaction().execute("INSERT");
                    Err(AppError::Repo(RepositoryError::NotFound))
                })
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Repo(RepositoryError::NotFound))
        ));
        assert_eq!(pool.journal.entries(), vec!["BEGIN", "INSERT", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn rolls_back_on_request() {
        let pool = MockPool::new();
        let result: Result<&str, AppError> = TransactionManager::new(&pool)
            .run(|ctx| {
                Box::pin(async move {
                    ctx.set_rollback_only();
                    Ok("dry run")
                })
            })
            .await;

        assert_eq!(result.unwrap(), "dry run");
        assert_eq!(pool.journal.entries(), vec!["BEGIN", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn applies_isolation_level() {
        let pool = MockPool::new();
        let manager = TransactionManager::new(&pool).isolation(IsolationLevel::RepeatableRead);
        assert_eq!(
            manager.config().isolation,
            Some(IsolationLevel::RepeatableRead)
        );

        let result: Result<(), AppError> = manager.run(|_| Box::pin(async { Ok(()) })).await;

        assert!(result.is_ok());
        assert_eq!(
            pool.journal.entries(),
            vec![
                "BEGIN",
                "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ WRITE",
                "COMMIT"
            ]
        );
    }

    #[tokio::test]
    async fn commit_failure_is_reported() {
        let mut pool = MockPool::new();
        pool.fail_commit = true;
        let result: Result<(), AppError> = TransactionManager::new(&pool)
            .run(|_| Box::pin(async { Ok(()) }))
            .await;

        assert!(matches!(result, Err(AppError::Tx(ref e)) if e.is_commit()));
    }

    #[tokio::test]
    async fn failed_rollback_keeps_original_error() {
        let mut pool = MockPool::new();
        pool.fail_rollback = true;
        let result: Result<(), AppError> = TransactionManager::new(&pool)
            .run(|_| Box::pin(async { Err(AppError::Repo(RepositoryError::TooManyResults)) }))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Repo(RepositoryError::TooManyResults))
        ));
    }
}
