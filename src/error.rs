// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Engine diagnostics.
//!
//! Every variant is fatal for the repository being compiled and names the
//! offending field path or function, so an emitter can report it next to
//! the declaration that caused it.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Mapping or query compilation failure.
#[derive(Debug, Error)]
pub enum Error {
    /// A leaf field whose type has no column mapping.
    #[error("cannot determine column type of `{path}`; annotate explicitly")]
    UnmappableType {
        /// Dotted field path from the entity root.
        path: String
    },

    /// Two columns of one table resolve to the same name.
    #[error("duplicate column `{column}` in table `{table}`")]
    DuplicateColumn {
        /// Table name.
        table:  String,
        /// Column name.
        column: String
    },

    /// A composite field declared nullable.
    #[error("nullable composite field `{path}` cannot be flattened into columns")]
    NullableComposite {
        /// Dotted field path from the entity root.
        path: String
    },

    /// A repository whose entity cannot be determined.
    #[error("repository `{repository}` does not declare an entity")]
    MissingEntity {
        /// Repository name.
        repository: String
    },

    /// A `:name` placeholder without a matching parameter.
    #[error("{function}: unknown parameter `{name}` in SQL text")]
    UnknownParameter {
        /// Function name.
        function: String,
        /// Placeholder name.
        name:     String
    },

    /// Declared parameters that no bind slot uses.
    #[error("{function}: unused parameters: {}", names.join(", "))]
    UnusedParameters {
        /// Function name.
        function: String,
        /// Parameter names.
        names:    Vec<String>
    },

    /// A derived finder or delete parameter without a matching column.
    #[error("{function}: parameter `{name}` does not match any column")]
    UnknownFinderParameter {
        /// Function name.
        function: String,
        /// Parameter name.
        name:     String
    },

    /// A save method whose parameter is neither the entity nor a list of it.
    #[error("{function}: save takes exactly one entity or list of entities")]
    InvalidSaveParameter {
        /// Function name.
        function: String
    },

    /// A `Pageable` parameter without a `Page` return type, or the reverse.
    #[error("{function}: a Pageable parameter requires a Page return type and vice versa")]
    PaginationMismatch {
        /// Function name.
        function: String
    },

    /// More than one limit source on one method.
    #[error("{function}: conflicting limits ({sources})")]
    AmbiguousLimit {
        /// Function name.
        function: String,
        /// Limit sources found, comma separated.
        sources:  String
    },

    /// `First` on a method returning a collection.
    #[error("{function}: First cannot be combined with a collection return type")]
    FirstOnCollection {
        /// Function name.
        function: String
    },

    /// A derived query returning something other than rows, a count or a
    /// boolean.
    #[error("{function}: unsupported return type `{ty}` for a derived query")]
    UnsupportedReturnType {
        /// Function name.
        function: String,
        /// Rendered return type.
        ty:       String
    },

    /// A projection field without a matching entity column.
    #[error("{function}: projection field `{path}` does not match any column")]
    UnknownProjectionField {
        /// Function name.
        function: String,
        /// Dotted field path inside the projection.
        path:     String
    },

    /// A finder parameter or projection field matching more than one
    /// column by leaf name or path suffix.
    #[error("{function}: `{name}` matches several columns: {}", candidates.join(", "))]
    AmbiguousColumn {
        /// Function name.
        function:   String,
        /// Parameter name or dotted projection path.
        name:       String,
        /// Matching column names.
        candidates: Vec<String>
    },

    /// An annotation parameter with a malformed value.
    #[error("{function}: invalid {annotation} value `{value}`")]
    InvalidAnnotation {
        /// Function name.
        function:   String,
        /// Annotation name.
        annotation: String,
        /// Offending value.
        value:      String
    },

    /// Rust source front end failure.
    #[error("{0}")]
    Source(#[from] darling::Error)
}

impl Error {
    /// Function name the error belongs to, when it is method-scoped.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter {
                function, ..
            }
            | Self::UnusedParameters {
                function, ..
            }
            | Self::UnknownFinderParameter {
                function, ..
            }
            | Self::InvalidSaveParameter {
                function
            }
            | Self::PaginationMismatch {
                function
            }
            | Self::AmbiguousLimit {
                function, ..
            }
            | Self::FirstOnCollection {
                function
            }
            | Self::UnsupportedReturnType {
                function, ..
            }
            | Self::UnknownProjectionField {
                function, ..
            }
            | Self::AmbiguousColumn {
                function, ..
            }
            | Self::InvalidAnnotation {
                function, ..
            } => Some(function),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmappable_message_asks_for_annotation() {
        let err = Error::UnmappableType {
            path: "spec.battery".into()
        };
        assert_eq!(
            err.to_string(),
            "cannot determine column type of `spec.battery`; annotate explicitly"
        );
        assert_eq!(err.function(), None);
    }

    #[test]
    fn unused_parameters_lists_names() {
        let err = Error::UnusedParameters {
            function: "find_by_name".into(),
            names:    vec!["age".into(), "city".into()]
        };
        assert_eq!(err.to_string(), "find_by_name: unused parameters: age, city");
        assert_eq!(err.function(), Some("find_by_name"));
    }

    #[test]
    fn ambiguous_column_lists_candidates() {
        let err = Error::AmbiguousColumn {
            function:   "find_by_city".into(),
            name:       "city".into(),
            candidates: vec!["home_city".into(), "work_city".into()]
        };
        assert_eq!(
            err.to_string(),
            "find_by_city: `city` matches several columns: home_city, work_city"
        );
        assert_eq!(err.function(), Some("find_by_city"));
    }

    #[test]
    fn source_errors_convert() {
        let err: Error = darling::Error::custom("bad attribute").into();
        assert!(matches!(err, Error::Source(_)));
        assert!(err.to_string().contains("bad attribute"));
    }
}
