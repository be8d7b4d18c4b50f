// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! INSERT and upsert.
//!
//! ```text
//! INSERT INTO t ("id", "name", "version") VALUES (?, ?, ? + 1)
//! ON CONFLICT ("id") DO UPDATE SET "name" = EXCLUDED."name", "version" = EXCLUDED."version"
//! WHERE t."version" = EXCLUDED."version" - 1
//! ```
//!
//! Without id columns, or with `OnConflictFail`, only the INSERT is emitted.

use super::{
    Archetype, MethodContext, QueryMethod, QueryMethodType, QueryParameter,
    archetype::entity_parameter, binder::Binder
};
use crate::{
    Error, Result,
    model::{Annotated, names}
};

pub(crate) fn compile(ctx: &MethodContext<'_>) -> Result<QueryMethod> {
    let invalid = || Error::InvalidSaveParameter {
        function: ctx.name().to_string()
    };
    let [parameter] = ctx.function.parameters.as_slice() else {
        return Err(invalid());
    };
    let method_type = entity_parameter(ctx, &parameter.ty).ok_or_else(invalid)?;

    let mut binder = Binder::new(ctx.config.placeholders);
    let mapping = ctx.mapping;
    let quote = |name: &str| ctx.config.quote(name);

    let mut names_list = Vec::with_capacity(mapping.columns.len());
    let mut values = Vec::with_capacity(mapping.columns.len());
    for column in &mapping.columns {
        let path = match method_type {
            QueryMethodType::Single => {
                let mut path = vec![parameter.name.clone()];
                path.extend(column.path.iter().cloned());
                path
            }
            QueryMethodType::Batch => column.path.clone()
        };
        let marker = binder.bind(QueryParameter::new(
            path,
            column.ty.clone(),
            Some(column.definition.db_type.clone())
        ));
        names_list.push(quote(column.name()));
        values.push(if column.definition.is_version {
            format!("{marker} + 1")
        } else {
            marker
        });
    }

    let table = ctx.table();
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names_list.join(", "),
        values.join(", ")
    );

    let upsert = mapping.has_ids() && !ctx.function.has_annotation(names::ON_CONFLICT_FAIL);
    if upsert {
        let ids: Vec<_> = mapping.ids().map(|c| quote(c.name())).collect();
        let updates: Vec<_> = mapping
            .columns
            .iter()
            .filter(|c| !c.definition.is_id)
            .map(|c| {
                let column = quote(c.name());
                format!("{column} = EXCLUDED.{column}")
            })
            .collect();

        sql.push_str(&format!(" ON CONFLICT ({})", ids.join(", ")));
        if updates.is_empty() {
            sql.push_str(" DO NOTHING");
        } else {
            sql.push_str(&format!(" DO UPDATE SET {}", updates.join(", ")));
            if let Some(version) = mapping.version() {
                let column = quote(version.name());
                sql.push_str(&format!(
                    " WHERE {table}.{column} = EXCLUDED.{column} - 1"
                ));
            }
        }
    }

    let mut method = QueryMethod::new(ctx.function, Archetype::Save, sql);
    method.query_parameters = binder.finish();
    method.method_type = method_type;
    method.optimistic_lock = upsert && mapping.version().is_some();
    Ok(method)
}
