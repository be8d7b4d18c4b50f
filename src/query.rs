// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository method compilation.
//!
//! Turns one [`KlassFunction`] of a repository into a [`QueryMethod`]: SQL
//! text, bind plan and return-shape plan.
//!
//! # Architecture
//!
//! ```text
//! query.rs (coordinator, QueryMethod)
//! ├── archetype.rs     - archetype selection, return shapes, parameter roles
//! ├── binder.rs        - bind slot allocation (? or $n)
//! ├── placeholders.rs  - :name scanning, IN (:x) rewriting
//! ├── modifiers.rs     - ORDER BY, LIMIT, pagination
//! ├── select.rs        - finders, count, exists
//! ├── save.rs          - INSERT / upsert
//! ├── delete.rs        - DELETE by entity, fields or condition
//! └── custom.rs        - Query / Statement text
//! ```
//!
//! # Archetypes
//!
//! | Archetype | Trigger | SQL |
//! |-----------|---------|-----|
//! | Save | `Save`, or name starts with `save` | `INSERT … ON CONFLICT … DO UPDATE` |
//! | Delete by entity | `Delete`/`delete…` with one entity parameter | `DELETE … WHERE id = ? AND version = ?` |
//! | Delete by fields | `Delete`/`delete…` with field parameters | `DELETE … WHERE col = ? AND …` |
//! | Delete where | `Delete`/`delete…` with `Where` | `DELETE … WHERE <text>` |
//! | Finder | default | `SELECT cols FROM … WHERE …` |
//! | Count | returns `i32`/`i64` | `SELECT count(*) FROM …` |
//! | Exists | returns `bool` | `SELECT EXISTS (SELECT * FROM …)` |
//! | Custom | `Query`/`Statement` | the given text |

mod archetype;
pub(crate) mod binder;
mod custom;
mod delete;
mod modifiers;
pub(crate) mod placeholders;
mod save;
mod select;

pub use archetype::Archetype;
use repogen_core::DbType;

use crate::{
    Config, Result,
    catalog::TypeCatalog,
    mapping::{ObjectConstructor, TableMapping},
    model::{Klass, KlassFunction, Type}
};

/// Execution shape of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethodType {
    /// One statement execution.
    Single,

    /// One batched execution over a list parameter.
    Batch
}

/// Parameter as declared on the function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMethodParameter {
    /// Parameter name.
    pub name: String,

    /// Declared type.
    pub ty: Type
}

/// One bind slot, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    /// Value path: parameter name followed by field names. For batch
    /// methods the path is relative to the list element and starts with a
    /// field name.
    pub path: Vec<String>,

    /// Type of the bound value.
    pub ty: Type,

    /// Column type the value is compared with or stored in.
    pub db_type: Option<DbType>,

    /// Bound as an array for `= ANY(?)`.
    pub is_in_clause: bool
}

impl QueryParameter {
    /// Create a scalar bind slot.
    pub fn new(path: Vec<String>, ty: Type, db_type: Option<DbType>) -> Self {
        Self {
            path,
            ty,
            db_type,
            is_in_clause: false
        }
    }

    /// Mark the slot as an array bind.
    #[must_use]
    pub fn in_clause(mut self) -> Self {
        self.is_in_clause = true;
        self
    }

    /// Dotted path, e.g. `person.spec.doors`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Value goes through a JSON codec.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.db_type.as_ref().is_some_and(DbType::is_json)
    }
}

/// Offset pagination of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Name of the `Pageable` parameter.
    pub parameter: String
}

/// Compiled repository method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMethod {
    /// Function name.
    pub name: String,

    /// Selected archetype.
    pub archetype: Archetype,

    /// Final SQL text.
    pub sql: String,

    /// Parameters as declared.
    pub parameters: Vec<QueryMethodParameter>,

    /// Bind slots in execution order.
    pub query_parameters: Vec<QueryParameter>,

    /// Declared return type.
    pub return_type: Type,

    /// Element type of a collection or page return, else the declared type.
    pub true_return_type: Type,

    /// Returns a list or page of rows.
    pub returns_collection: bool,

    /// Returns a single scalar value.
    pub returns_scalar: bool,

    /// Row reconstruction plan; `None` for methods returning nothing.
    pub constructor: Option<ObjectConstructor>,

    /// Offset pagination.
    pub pagination: Option<Pagination>,

    /// Single or batched execution.
    pub method_type: QueryMethodType,

    /// `Order` parameter whose clause replaces
    /// [`ORDER_BY_MARKER`](repogen_core::ORDER_BY_MARKER).
    pub order_parameter: Option<String>,

    /// Affected rows must be verified against the version guard.
    pub optimistic_lock: bool,

    /// Non-returning statement.
    pub is_statement: bool
}

impl QueryMethod {
    /// Method skeleton with the function's declared signature.
    pub(crate) fn new(function: &KlassFunction, archetype: Archetype, sql: String) -> Self {
        Self {
            name: function.name.clone(),
            archetype,
            sql,
            parameters: function
                .parameters
                .iter()
                .map(|p| QueryMethodParameter {
                    name: p.name.clone(),
                    ty:   p.ty.clone()
                })
                .collect(),
            query_parameters: Vec::new(),
            return_type: function.return_type.clone(),
            true_return_type: function.return_type.clone(),
            returns_collection: false,
            returns_scalar: false,
            constructor: None,
            pagination: None,
            method_type: QueryMethodType::Single,
            order_parameter: None,
            optimistic_lock: false,
            is_statement: false
        }
    }

    /// Single-result method: at most one row, multiplicity checked.
    #[must_use]
    pub fn is_single_result(&self) -> bool {
        !self.returns_collection
            && !self.is_statement
            && self.constructor.is_some()
            && !matches!(self.archetype, Archetype::Count | Archetype::Exists)
    }
}

/// Everything a method compiler needs about its surroundings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodContext<'a> {
    pub(crate) config:   &'a Config,
    pub(crate) catalog:  &'a TypeCatalog,
    pub(crate) mapping:  &'a TableMapping,
    pub(crate) entity:   &'a Klass,
    pub(crate) function: &'a KlassFunction
}

impl MethodContext<'_> {
    pub(crate) fn name(&self) -> &str {
        &self.function.name
    }

    pub(crate) fn table(&self) -> String {
        self.mapping.table_ref(self.config)
    }
}

/// Compiles the functions of one repository.
#[derive(Debug, Clone, Copy)]
pub struct MethodCompiler<'a> {
    config:  &'a Config,
    catalog: &'a TypeCatalog,
    mapping: &'a TableMapping,
    entity:  &'a Klass
}

impl<'a> MethodCompiler<'a> {
    /// Create a compiler for methods of the repository mapping `entity`.
    pub const fn new(
        config: &'a Config,
        catalog: &'a TypeCatalog,
        mapping: &'a TableMapping,
        entity: &'a Klass
    ) -> Self {
        Self {
            config,
            catalog,
            mapping,
            entity
        }
    }

    /// Compile one function.
    ///
    /// # Errors
    ///
    /// Any method-scoped [`Error`](crate::Error).
    pub fn compile(&self, function: &KlassFunction) -> Result<QueryMethod> {
        let ctx = MethodContext {
            config: self.config,
            catalog: self.catalog,
            mapping: self.mapping,
            entity: self.entity,
            function
        };
        let archetype = archetype::classify(&ctx);
        let method = match archetype {
            Archetype::Save => save::compile(&ctx),
            Archetype::DeleteByEntity | Archetype::DeleteByFields | Archetype::DeleteWhere => {
                delete::compile(&ctx, archetype)
            }
            Archetype::Finder | Archetype::Count | Archetype::Exists => {
                select::compile(&ctx, archetype)
            }
            Archetype::Custom => custom::compile(&ctx)
        }?;

        tracing::debug!(
            function = %function.name,
            archetype = ?archetype,
            sql = %method.sql,
            binds = method.query_parameters.len(),
            "method compiled"
        );
        Ok(method)
    }
}
