// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! DELETE by entity, by fields and by condition.

use super::{
    Archetype, MethodContext, QueryMethod, QueryMethodType, QueryParameter,
    archetype::{entity_parameter, reject_modifier_parameters, value_parameters},
    binder::Binder,
    select
};
use crate::{Result, mapping::ColumnMapping, model::Parameter};

pub(crate) fn compile(ctx: &MethodContext<'_>, archetype: Archetype) -> Result<QueryMethod> {
    reject_modifier_parameters(ctx)?;
    let mut binder = Binder::new(ctx.config.placeholders);
    let mut sql = format!("DELETE FROM {}", ctx.table());

    let entity = value_parameters(ctx)
        .next()
        .filter(|_| archetype == Archetype::DeleteByEntity);
    let (method_type, optimistic_lock) = if let Some(parameter) = entity {
        let (method_type, guard) = by_entity(ctx, parameter, &mut binder);
        sql.push_str(" WHERE ");
        sql.push_str(&guard);
        (method_type, ctx.mapping.has_ids() && ctx.mapping.version().is_some())
    } else {
        if let Some(condition) = select::condition(ctx, &mut binder)? {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        (QueryMethodType::Single, false)
    };

    let mut method = QueryMethod::new(ctx.function, archetype, sql);
    method.query_parameters = binder.finish();
    method.method_type = method_type;
    method.optimistic_lock = optimistic_lock;
    Ok(method)
}

/// Guard matching one stored entity: ids and version, or every column of
/// an idless table.
fn by_entity(
    ctx: &MethodContext<'_>,
    parameter: &Parameter,
    binder: &mut Binder
) -> (QueryMethodType, String) {
    let method_type = entity_parameter(ctx, &parameter.ty).unwrap_or(QueryMethodType::Single);

    let mapping = ctx.mapping;
    let guarded: Vec<&ColumnMapping> = if mapping.has_ids() {
        mapping
            .columns
            .iter()
            .filter(|c| c.definition.is_id || c.definition.is_version)
            .collect()
    } else {
        mapping.columns.iter().collect()
    };

    let conditions: Vec<String> = guarded
        .into_iter()
        .map(|column| {
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
            let quoted = ctx.config.quote(column.name());
            if column.definition.nullable {
                format!("{quoted} IS NOT DISTINCT FROM {marker}")
            } else {
                format!("{quoted} = {marker}")
            }
        })
        .collect();
    (method_type, conditions.join(" AND "))
}
