// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `Query` and `Statement` text.
//!
//! The text is kept verbatim apart from placeholder substitution and the
//! ORDER BY / LIMIT / pagination suffixes. No single-result cap is added;
//! the author controls the row count.
//!
//! A projection return type binds by field path to the entity's columns,
//! the same way a derived projection does. Select-list aliases are not
//! parsed, so every projection field must name an entity column path.

use super::{
    Archetype, MethodContext, QueryMethod,
    archetype::{ReturnShape, check_unused, lookup_value},
    binder::Binder,
    modifiers::Modifiers,
    placeholders
};
use crate::{
    Error, Result,
    mapping::{ConstructorPlanner, ObjectConstructor},
    model::{Annotated, names}
};

pub(crate) fn compile(ctx: &MethodContext<'_>) -> Result<QueryMethod> {
    let function = ctx.function;
    let (annotation, is_statement) = match function.annotation(names::STATEMENT) {
        Some(statement) => (statement, true),
        None => match function.annotation(names::QUERY) {
            Some(query) => (query, false),
            None => {
                return Err(missing(ctx, names::QUERY));
            }
        }
    };
    let text = annotation
        .value()
        .ok_or_else(|| missing(ctx, &annotation.name))?;

    let shape = ReturnShape::of(&function.return_type, ctx.catalog);
    let modifiers = Modifiers::of(ctx, &shape, false)?;

    let mut binder = Binder::new(ctx.config.placeholders);
    let segments = placeholders::parse(text);
    let (mut sql, used) = placeholders::render(&segments, &mut binder, ctx.name(), |name, in_clause| {
        lookup_value(ctx, name, in_clause)
    })?;
    check_unused(ctx, &used)?;
    modifiers.apply(ctx, &mut sql, &mut binder);

    let mut method = QueryMethod::new(function, Archetype::Custom, sql);
    method.query_parameters = binder.finish();
    method.true_return_type = shape.element.clone();
    method.returns_collection = shape.is_many();
    method.returns_scalar = shape.scalar;
    method.constructor = constructor(ctx, &shape)?;
    method.is_statement = is_statement;
    modifiers.annotate(&mut method);
    Ok(method)
}

fn missing(ctx: &MethodContext<'_>, annotation: &str) -> Error {
    Error::InvalidAnnotation {
        function:   ctx.name().to_string(),
        annotation: annotation.to_string(),
        value:      String::new()
    }
}

/// Row plan for the declared return type. Projection fields resolve
/// against entity columns only.
fn constructor(ctx: &MethodContext<'_>, shape: &ReturnShape) -> Result<Option<ObjectConstructor>> {
    let element = &shape.element;
    let planner = ConstructorPlanner::new(ctx.catalog);
    if shape.unit {
        return Ok(None);
    }
    if shape.scalar {
        return planner.scalar(element).map(Some);
    }
    if element.name() == &ctx.entity.name {
        return Ok(ctx.mapping.constructor.clone());
    }
    if element.klass.is_composite() {
        let (plan, _) = planner.projection(ctx.name(), &element.klass, &ctx.mapping.columns)?;
        return Ok(Some(plan));
    }
    Err(Error::UnmappableType {
        path: element.to_string()
    })
}
