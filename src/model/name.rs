// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Qualified type names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace plus simple name of a type.
///
/// Rust paths split at the last `::`: `std::string::String` has namespace
/// `std::string` and name `String`; `i32` has an empty namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Leading path segments joined by `::`, empty for bare names.
    #[serde(default)]
    pub namespace: String,

    /// Last path segment.
    pub name: String
}

impl QualifiedName {
    /// Create a name from its parts.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name:      name.into()
        }
    }

    /// Create a name without namespace.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    /// Split a `::` separated path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use repogen::model::QualifiedName;
    ///
    /// let name = QualifiedName::from_path("uuid::Uuid");
    /// assert_eq!(name, QualifiedName::new("uuid", "Uuid"));
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once("::") {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::simple(path)
        }
    }

    /// Check whether the namespace is empty.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}
