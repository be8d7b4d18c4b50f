// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compiled repositories and their grouping by database.
//!
//! These are the values a code emitter consumes: one
//! [`RepositoryDescription`] per repository trait, grouped into one
//! [`DatabaseDescription`] per database name.

use crate::{mapping::TableMapping, model::QualifiedName, query::QueryMethod, schema::SchemaCheck};

/// Everything generated for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescription {
    /// Repository name.
    pub name: QualifiedName,

    /// Database the repository belongs to.
    pub database: String,

    /// Entity class name.
    pub entity: QualifiedName,

    /// Table mapping of the entity.
    pub mapping: TableMapping,

    /// Compiled methods: declared ones first, then synthesized base
    /// methods.
    pub methods: Vec<QueryMethod>,

    /// Schema validation routine.
    pub check: SchemaCheck
}

impl RepositoryDescription {
    /// Find a compiled method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&QueryMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Repositories sharing one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDescription {
    /// Database name.
    pub name: String,

    /// Repositories in input order.
    pub repositories: Vec<RepositoryDescription>
}

impl DatabaseDescription {
    /// Find a repository by simple name.
    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&RepositoryDescription> {
        self.repositories.iter().find(|r| r.name.name == name)
    }
}

/// Group repositories by database, databases in order of first appearance.
pub fn group(repositories: Vec<RepositoryDescription>) -> Vec<DatabaseDescription> {
    let mut databases: Vec<DatabaseDescription> = Vec::new();
    for repository in repositories {
        match databases.iter_mut().find(|d| d.name == repository.database) {
            Some(database) => database.repositories.push(repository),
            None => databases.push(DatabaseDescription {
                name:         repository.database.clone(),
                repositories: vec![repository]
            })
        }
    }
    databases
}
