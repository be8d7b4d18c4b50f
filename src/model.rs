// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Language-neutral class model.
//!
//! Everything downstream of the front end works on these trees: the
//! column flattener walks entity fields, the query compiler walks
//! repository functions. The model can be built directly, deserialized
//! with serde, or produced from Rust source by [`crate::source`].
//!
//! # Architecture
//!
//! ```text
//! model.rs (coordinator)
//! ├── name.rs        - QualifiedName
//! ├── annotation.rs  - Annotation, recognized names, Annotated lookups
//! └── klass.rs       - Klass, Type, Field, Parameter, KlassFunction
//! ```

mod annotation;
mod klass;
mod name;

pub use annotation::{Annotated, Annotation, ColumnAnnotation, VALUE, names};
pub use klass::{Field, Klass, KlassFunction, Nullability, Parameter, Type};
pub use name::QualifiedName;
