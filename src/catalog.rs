// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Host type to column type catalog.
//!
//! Maps well-known Rust types to a PostgreSQL column type and the accessor
//! name the emitter uses to read or write a value of that type.
//!
//! # Built-in types
//!
//! | Rust type | Column type | Accessor | Primitive |
//! |-----------|-------------|----------|-----------|
//! | `bool` | `BOOLEAN` | `bool` | yes |
//! | `i8`, `i16` | `SMALLINT` | `i16` | yes |
//! | `i32`, `u16` | `INTEGER` | `i32` | yes |
//! | `i64`, `u32` | `BIGINT` | `i64` | yes |
//! | `f32` | `REAL` | `f32` | yes |
//! | `f64` | `DOUBLE PRECISION` | `f64` | yes |
//! | `String`, `str` | `TEXT` | `string` | |
//! | `Vec<u8>`, `Bytes` | `BYTEA` | `bytes` | |
//! | `NaiveDate`, `time::Date` | `DATE` | `date` | |
//! | `NaiveTime`, `time::Time` | `TIME` | `time` | |
//! | `NaiveDateTime`, `PrimitiveDateTime` | `TIMESTAMP` | `timestamp` | |
//! | `DateTime`, `OffsetDateTime` | `TIMESTAMPTZ` | `timestamptz` | |
//! | `Decimal`, `BigDecimal` | `NUMERIC` | `decimal` | |
//! | `Uuid` | `UUID` | `uuid` | |
//! | `Vec`, `List`, `HashMap`, `BTreeMap`, `Map`, `serde_json::Value` | `JSONB` | `json` | |
//! | `()` | `VOID` | `unit` | |
//!
//! Primitive accessors yield a zero value on SQL NULL, so nullable uses of
//! them need an explicit was-null check after the read.
//!
//! # Synonyms
//!
//! Every entry is registered under its bare name and its qualified
//! spellings (`String`, `std::string::String`, `alloc::string::String`), so
//! all of them resolve to the same [`KnownType`].
//!
//! A class with fields or an enum never resolves through the catalog, so a
//! local `struct Value { .. }` is flattened rather than stored as JSON.

use std::collections::HashMap;

use repogen_core::DbType;

use crate::model::{QualifiedName, Type};

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownType {
    /// Column type.
    pub db_type: DbType,

    /// Accessor name used by the emitter.
    pub accessor: &'static str,

    /// Accessor yields a zero value on NULL.
    pub primitive: bool
}

impl KnownType {
    const fn new(db_type: DbType, accessor: &'static str, primitive: bool) -> Self {
        Self {
            db_type,
            accessor,
            primitive
        }
    }
}

/// Kind of generic container a name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    List,
    Map
}

const LIST_NAMES: &[&str] = &[
    "Vec",
    "std::vec::Vec",
    "alloc::vec::Vec",
    "List",
    "VecDeque",
    "std::collections::VecDeque",
    "HashSet",
    "std::collections::HashSet",
    "BTreeSet",
    "std::collections::BTreeSet"
];

const MAP_NAMES: &[&str] = &[
    "HashMap",
    "std::collections::HashMap",
    "BTreeMap",
    "std::collections::BTreeMap",
    "Map",
    "serde_json::Map"
];

/// Name of the unit type.
pub const UNIT: &str = "()";

/// Lookup table from type names to [`KnownType`]s.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    entries:    HashMap<QualifiedName, KnownType>,
    containers: HashMap<QualifiedName, Container>
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalog {
    /// Catalog with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self {
            entries:    HashMap::new(),
            containers: HashMap::new()
        };

        let json = KnownType::new(DbType::Jsonb, "json", false);
        let builtins: [(&[&str], KnownType); 17] = [
            (&["bool"], KnownType::new(DbType::Boolean, "bool", true)),
            (&["i8", "i16"], KnownType::new(DbType::SmallInt, "i16", true)),
            (&["i32", "u16"], KnownType::new(DbType::Integer, "i32", true)),
            (&["i64", "u32"], KnownType::new(DbType::BigInt, "i64", true)),
            (&["f32"], KnownType::new(DbType::Real, "f32", true)),
            (&["f64"], KnownType::new(DbType::DoublePrecision, "f64", true)),
            (
                &["String", "std::string::String", "alloc::string::String", "str"],
                KnownType::new(DbType::Text, "string", false)
            ),
            (
                &["Bytes", "bytes::Bytes"],
                KnownType::new(DbType::Bytea, "bytes", false)
            ),
            (
                &["NaiveDate", "chrono::NaiveDate", "time::Date"],
                KnownType::new(DbType::Date, "date", false)
            ),
            (
                &["NaiveTime", "chrono::NaiveTime", "time::Time"],
                KnownType::new(DbType::Time, "time", false)
            ),
            (
                &[
                    "NaiveDateTime",
                    "chrono::NaiveDateTime",
                    "PrimitiveDateTime",
                    "time::PrimitiveDateTime"
                ],
                KnownType::new(DbType::Timestamp, "timestamp", false)
            ),
            (
                &[
                    "DateTime",
                    "chrono::DateTime",
                    "OffsetDateTime",
                    "time::OffsetDateTime"
                ],
                KnownType::new(DbType::TimestampTz, "timestamptz", false)
            ),
            (
                &[
                    "Decimal",
                    "rust_decimal::Decimal",
                    "BigDecimal",
                    "bigdecimal::BigDecimal"
                ],
                KnownType::new(DbType::Numeric, "decimal", false)
            ),
            (
                &["Uuid", "uuid::Uuid"],
                KnownType::new(DbType::Uuid, "uuid", false)
            ),
            (&["Value", "serde_json::Value"], json.clone()),
            (LIST_NAMES, json.clone()),
            (MAP_NAMES, json)
        ];

        for (names, known) in builtins {
            for name in names {
                catalog.register(name, known.clone());
            }
        }
        catalog.register(
            UNIT,
            KnownType::new(DbType::Other("VOID".to_string()), "unit", false)
        );
        for primitive in [
            "bool", "i8", "i16", "i32", "i64", "u16", "u32", "f32", "f64", "str"
        ] {
            if let Some(known) = catalog.entries.get(&QualifiedName::simple(primitive)).cloned() {
                catalog.register(&format!("std::primitive::{primitive}"), known.clone());
                catalog.register(&format!("core::primitive::{primitive}"), known);
            }
        }
        for name in LIST_NAMES {
            catalog
                .containers
                .insert(QualifiedName::from_path(name), Container::List);
        }
        for name in MAP_NAMES {
            catalog
                .containers
                .insert(QualifiedName::from_path(name), Container::Map);
        }

        catalog
    }

    /// Register or replace an entry under a `::` separated path.
    pub fn register(&mut self, path: &str, known: KnownType) {
        self.entries.insert(QualifiedName::from_path(path), known);
    }

    /// Look up a type by name.
    #[must_use]
    pub fn lookup(&self, name: &QualifiedName) -> Option<&KnownType> {
        self.entries.get(name)
    }

    /// Resolve a type use, honouring generic arguments.
    ///
    /// `Vec<u8>` resolves to `BYTEA` instead of the list entry. Declared
    /// classes (with fields, or enums) are never catalog types.
    #[must_use]
    pub fn resolve(&self, ty: &Type) -> Option<KnownType> {
        if ty.klass.is_composite() || ty.klass.is_enum {
            return None;
        }
        if self.is_list(ty.name())
            && ty
                .element()
                .is_some_and(|e| e.name().name == "u8" && e.parameters.is_empty())
        {
            return Some(KnownType::new(DbType::Bytea, "bytes", false));
        }
        self.lookup(ty.name()).cloned()
    }

    /// Check whether a name denotes a list container.
    #[must_use]
    pub fn is_list(&self, name: &QualifiedName) -> bool {
        self.containers.get(name) == Some(&Container::List)
    }

    /// Check whether a name denotes a map container.
    #[must_use]
    pub fn is_map(&self, name: &QualifiedName) -> bool {
        self.containers.get(name) == Some(&Container::Map)
    }

    /// Check whether a type use is a list other than a byte array.
    #[must_use]
    pub fn is_collection(&self, ty: &Type) -> bool {
        self.is_list(ty.name())
            && self
                .resolve(ty)
                .is_none_or(|known| known.db_type != DbType::Bytea)
    }

    /// Check whether a name denotes the unit type.
    #[must_use]
    pub fn is_unit(name: &QualifiedName) -> bool {
        name.is_simple() && name.name == UNIT
    }

    /// Accessor used for a column type that came from an explicit
    /// `Column(type)` override.
    #[must_use]
    pub fn accessor_for(db_type: &DbType) -> &'static str {
        match db_type {
            DbType::Boolean => "bool",
            DbType::SmallInt => "i16",
            DbType::Integer => "i32",
            DbType::BigInt => "i64",
            DbType::Real => "f32",
            DbType::DoublePrecision => "f64",
            DbType::Numeric => "decimal",
            DbType::Text | DbType::Other(_) => "string",
            DbType::Bytea => "bytes",
            DbType::Date => "date",
            DbType::Time => "time",
            DbType::Timestamp => "timestamp",
            DbType::TimestampTz => "timestamptz",
            DbType::Uuid => "uuid",
            DbType::Jsonb => "json"
        }
    }
}

/// Runtime wrapper types recognized by simple name.
pub mod runtime {
    use crate::model::QualifiedName;

    /// `repogen_core::Page`.
    pub const PAGE: &str = "Page";
    /// `repogen_core::Pageable`.
    pub const PAGEABLE: &str = "Pageable";
    /// `repogen_core::Order`.
    pub const ORDER: &str = "Order";

    /// Check whether a name refers to a runtime type, bare or qualified
    /// with `repogen_core`.
    #[must_use]
    pub fn is(name: &QualifiedName, runtime: &str) -> bool {
        name.name == runtime
            && (name.is_simple() || name.namespace == "repogen_core" || name.namespace == "repogen_core::prelude")
    }
}
