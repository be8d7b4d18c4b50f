// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # repogen
//!
//! Mapping engine for generated repositories.
//!
//! Takes annotated entity classes and repository interfaces and produces,
//! per repository, the SQL text, bind order and row reconstruction plan of
//! every method, plus the expected schema for a startup check. Emitting the
//! repository code itself is left to the caller; generated code links
//! against [`repogen_core`] at run time.
//!
//! ## Quick Start
//!
//! ```rust
//! use repogen::{Compiler, Config, source};
//!
//! let model = source::parse_str(r#"
//!     struct Person {
//!         #[id]
//!         id: i64,
//!         name: String,
//!         #[version]
//!         version: i32,
//!     }
//!
//!     trait PersonRepository: Repository<Person> {
//!         fn count_by_name(&self, name: String) -> i64;
//!     }
//! "#).unwrap();
//!
//! let repository = Compiler::new(Config::default())
//!     .compile_repository(model.repository("PersonRepository").unwrap())
//!     .unwrap();
//!
//! assert_eq!(
//!     repository.method("count_by_name").unwrap().sql,
//!     "SELECT count(*) FROM \"person\" WHERE \"name\" = ?"
//! );
//! assert!(repository.method("save").unwrap().optimistic_lock);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! lib.rs
//! ├── model       - Klass, Type, Field, KlassFunction, annotations
//! ├── catalog     - host type → column type and accessor
//! ├── mapping     - column flattening and row reconstruction plans
//! ├── query       - method archetypes, SQL and bind plans
//! ├── schema      - expected columns and information_schema query
//! ├── repository  - RepositoryDescription, DatabaseDescription
//! ├── compiler    - Compiler entry point
//! ├── source      - Rust source front end (syn + darling)
//! ├── config      - Config
//! └── error       - Error
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Klass model ──► ColumnFlattener ──► TableMapping ──┬─► ConstructorPlanner
//!                                                    ├─► MethodCompiler ──► QueryMethod list
//!                                                    └─► SchemaCheck
//! ```
//!
//! The engine is synchronous and performs no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
mod compiler;
pub mod config;
mod error;
pub mod mapping;
pub mod model;
pub mod query;
pub mod repository;
pub mod schema;
pub mod source;

pub use compiler::Compiler;
pub use config::{Config, PlaceholderStyle};
pub use error::{Error, Result};
pub use repository::{DatabaseDescription, RepositoryDescription};
