// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Offset pagination.
//!
//! A repository method taking a [`Pageable`] parameter must return a
//! [`Page`]; the generator appends `LIMIT ? OFFSET ?` to its SQL and binds
//! [`Pageable::limit`] and [`Pageable::offset`] after every other parameter.

/// Pagination request.
///
/// # Example
///
/// ```rust
/// use repogen_core::Pageable;
///
/// let first = Pageable::new(0, 25); // offset 0, limit 25
/// let third = Pageable::new(2, 25); // offset 50, limit 25
/// assert_eq!(third.offset(), 50);
/// assert_eq!(first.next(), Pageable::new(1, 25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    /// Page number (0-indexed).
    pub page: i64,

    /// Items per page.
    pub size: i64
}

impl Pageable {
    /// Create pagination for a specific page.
    ///
    /// # Arguments
    ///
    /// * `page` — Page number (0-indexed)
    /// * `size` — Items per page
    pub const fn new(page: i64, size: i64) -> Self {
        Self {
            page,
            size
        }
    }

    /// Value bound to `LIMIT ?`.
    pub const fn limit(&self) -> i64 {
        self.size
    }

    /// Value bound to `OFFSET ?`; saturates at `i64::MAX`.
    pub const fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// The following page with the same size.
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size
        }
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: 100
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The request that produced this page.
    pub pageable: Pageable,

    /// Rows of this page, at most `pageable.size` of them.
    pub content: Vec<T>
}

impl<T> Page<T> {
    /// Wrap query results.
    pub const fn new(pageable: Pageable, content: Vec<T>) -> Self {
        Self {
            pageable,
            content
        }
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether a following page may hold more rows.
    ///
    /// A full page is assumed to have a successor; only a short page proves
    /// the end was reached.
    pub fn may_have_next(&self) -> bool {
        i64::try_from(self.content.len()).is_ok_and(|len| len >= self.pageable.size)
    }

    /// Convert the rows while keeping the request.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            pageable: self.pageable,
            content:  self.content.into_iter().map(f).collect()
        }
    }
}
