// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Explicit retry helper.
//!
//! Generated code never retries on its own. Callers that want to resolve
//! optimistic-lock conflicts by re-reading and re-applying a change wrap the
//! whole unit of work:
//!
//! ```rust,ignore
//! retry(3, RepositoryError::is_optimistic_lock, || async {
//!     let mut account = repo.find_by_id(id).await?;
//!     account.balance += amount;
//!     repo.save(&account).await
//! })
//! .await?;
//! ```

use std::future::Future;

/// Run `op`, retrying up to `retries` more times while it fails with an
/// error accepted by `is_retryable`.
///
/// The first error not accepted by `is_retryable`, or the last error once
/// the retries are used up, is returned unchanged.
///
/// # Errors
///
/// Whatever `op` returns last.
pub async fn retry<T, E, F, Fut, P>(retries: usize, is_retryable: P, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retries && is_retryable(&err) => {
                attempt += 1;
                tracing::warn!(attempt, retries, "retrying after retryable failure");
            }
            Err(err) => return Err(err)
        }
    }
}
