// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository compilation entry point.
//!
//! # Pipeline
//!
//! ```text
//! repository Klass
//!   │ superclass_parameter
//!   ▼
//! entity Klass ──► TableMapping ──┬─► declared abstract functions ─┐
//!                                 ├─► synthesized base methods ────┴─► QueryMethod list
//!                                 └─► SchemaCheck
//! ```
//!
//! # Base methods
//!
//! Every repository exposes these; a declared function with the same name
//! takes precedence over the synthesized one.
//!
//! | Name | Signature |
//! |------|-----------|
//! | `save` | `save(item: E)` |
//! | `save_all` | `save_all(items: Vec<E>)` |
//! | `find_all` | `find_all() -> Vec<E>` |
//! | `delete_all` | `delete_all()` |

use crate::{
    Config, Error, Result,
    catalog::TypeCatalog,
    mapping::TableMapping,
    model::{Annotated, Klass, KlassFunction, Parameter, Type, names},
    query::MethodCompiler,
    repository::{self, DatabaseDescription, RepositoryDescription},
    schema::SchemaCheck
};

/// Compiles repository declarations into descriptions.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config:  Config,
    catalog: TypeCatalog
}

impl Compiler {
    /// Create a compiler with the built-in type catalog.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: TypeCatalog::new()
        }
    }

    /// Replace the type catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Active type catalog.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Compile one repository declaration.
    ///
    /// # Errors
    ///
    /// [`Error::MissingEntity`] when the repository names no entity,
    /// [`Error::UnmappableType`] when the entity has no fields, and any
    /// mapping or method error.
    pub fn compile_repository(&self, repository: &Klass) -> Result<RepositoryDescription> {
        let entity_type = repository
            .superclass_parameter
            .as_deref()
            .filter(|t| !TypeCatalog::is_unit(t.name()))
            .ok_or_else(|| Error::MissingEntity {
                repository: repository.name.to_string()
            })?;
        let entity = &entity_type.klass;
        if !entity.is_composite() {
            return Err(Error::UnmappableType {
                path: entity.name.to_string()
            });
        }

        tracing::debug!(repository = %repository.name, entity = %entity.name, "compiling repository");

        let mapping = TableMapping::build(entity, Some(repository), &self.catalog, &self.config)?;
        let compiler = MethodCompiler::new(&self.config, &self.catalog, &mapping, entity);

        let mut methods = repository
            .functions
            .iter()
            .filter(|f| f.is_abstract)
            .map(|f| compiler.compile(f))
            .collect::<Result<Vec<_>>>()?;
        for function in base_functions(entity) {
            if repository.function(&function.name).is_none() {
                methods.push(compiler.compile(&function)?);
            }
        }

        let database = repository
            .annotation(names::REPOSITORY)
            .and_then(|a| a.param("database"))
            .map_or_else(|| self.config.default_database.clone(), str::to_string);

        tracing::debug!(
            repository = %repository.name,
            database = %database,
            methods = methods.len(),
            "repository compiled"
        );

        Ok(RepositoryDescription {
            name: repository.name.clone(),
            database,
            entity: entity.name.clone(),
            check: SchemaCheck::new(&mapping, &self.config),
            mapping,
            methods
        })
    }

    /// Compile every repository and group them by database.
    ///
    /// # Errors
    ///
    /// The first repository error, in input order.
    pub fn compile_all(&self, repositories: &[Klass]) -> Result<Vec<DatabaseDescription>> {
        let compiled = repositories
            .iter()
            .map(|r| self.compile_repository(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(repository::group(compiled))
    }
}

/// Signatures of the base methods for `entity`.
fn base_functions(entity: &Klass) -> [KlassFunction; 4] {
    let item = Type::new(entity.clone());
    let items = Type::named("Vec").with_parameters(vec![item.clone()]);
    [
        KlassFunction::new("save", Type::unit()).with_parameter(Parameter::new("item", item)),
        KlassFunction::new("save_all", Type::unit()).with_parameter(Parameter::new("items", items.clone())),
        KlassFunction::new("find_all", items),
        KlassFunction::new("delete_all", Type::unit())
    ]
}
