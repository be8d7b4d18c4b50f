// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Result-shape checks shared by generated methods.
//!
//! # Single results
//!
//! Single-result SELECTs are generated with a `LIMIT 2` cap. [`single`]
//! reads the first row and then asks whether another one follows, so
//! "more than one" is detected without counting. A third or later row is
//! never read.
//!
//! # Affected rows
//!
//! Version-guarded upserts and deletes report how many rows they touched;
//! [`verify_affected`] and [`verify_batch_affected`] turn a shortfall into
//! [`RepositoryError::OptimisticLock`].

use crate::RepositoryError;

/// Extract at most one row.
///
/// Returns `Ok(None)` for an empty result, the row for exactly one, and
/// [`RepositoryError::TooManyResults`] as soon as a second row exists.
///
/// # Example
///
/// ```rust
/// use repogen_core::result::single;
///
/// assert_eq!(single(Vec::<i32>::new()).unwrap(), None);
/// assert_eq!(single(vec![7]).unwrap(), Some(7));
/// assert!(single(vec![7, 8]).is_err());
/// ```
///
/// # Errors
///
/// [`RepositoryError::TooManyResults`] when the rows hold two or more items.
pub fn single<T, I>(rows: I) -> Result<Option<T>, RepositoryError>
where
    I: IntoIterator<Item = T>
{
    let mut rows = rows.into_iter();
    let Some(first) = rows.next() else {
        return Ok(None);
    };
    if rows.next().is_some() {
        return Err(RepositoryError::TooManyResults);
    }
    Ok(Some(first))
}

/// Extract exactly one row for a non-nullable return type.
///
/// # Errors
///
/// [`RepositoryError::NotFound`] for an empty result,
/// [`RepositoryError::TooManyResults`] for two or more rows.
pub fn single_required<T, I>(rows: I) -> Result<T, RepositoryError>
where
    I: IntoIterator<Item = T>
{
    single(rows)?.ok_or(RepositoryError::NotFound)
}

/// Check the affected-row count of a single version-guarded write.
///
/// # Errors
///
/// [`RepositoryError::OptimisticLock`] when the count differs from
/// `expected` in either direction.
pub fn verify_affected(expected: u64, actual: u64) -> Result<(), RepositoryError> {
    if actual != expected {
        tracing::debug!(expected, actual, "optimistic lock conflict");
        return Err(RepositoryError::OptimisticLock {
            expected,
            actual
        });
    }
    Ok(())
}

/// Check the per-statement affected-row counts of a batched write.
///
/// The total must equal the batch size.
///
/// # Errors
///
/// [`RepositoryError::OptimisticLock`] when the counts do not add up to
/// `batch_size`.
pub fn verify_batch_affected(counts: &[u64], batch_size: usize) -> Result<(), RepositoryError> {
    let expected = u64::try_from(batch_size).unwrap_or(u64::MAX);
    verify_affected(expected, counts.iter().sum())
}
