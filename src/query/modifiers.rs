// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! ORDER BY, LIMIT and pagination suffixes.
//!
//! Appended after the WHERE clause in this order:
//!
//! ```text
//! [ORDER BY <text> | %orderBy] [LIMIT n | LIMIT ? | LIMIT 1 | LIMIT <cap>] [LIMIT ? OFFSET ?]
//! ```
//!
//! At most one limit source is allowed per method: a `Limit(n)`
//! annotation, a `Limit`-annotated parameter, `First`, or a `Pageable`
//! parameter. Combining two of them is a compile error. Without any, a
//! single-result SELECT gets [`Config::single_result_cap`](crate::Config)
//! so the runtime can detect a second row without reading further.

use repogen_core::{DbType, ORDER_BY_MARKER};

use super::{
    MethodContext, Pagination, QueryMethod, QueryParameter,
    archetype::{ParamRole, ReturnShape, role},
    binder::Binder
};
use crate::{
    Error, Result,
    model::{Annotated, Parameter, Type, names}
};

#[derive(Debug, Clone)]
enum Limit {
    Literal(u64),
    Parameter(Parameter),
    First,
    Cap(u32)
}

/// Suffix plan of one SELECT.
#[derive(Debug, Clone)]
pub(crate) struct Modifiers {
    order_by:    Option<String>,
    order_param: Option<String>,
    limit:       Option<Limit>,
    pageable:    Option<String>
}

impl Modifiers {
    /// Collect and validate the modifiers of the current function.
    ///
    /// `cap` enables the single-result safety LIMIT.
    pub(crate) fn of(ctx: &MethodContext<'_>, shape: &ReturnShape, cap: bool) -> Result<Self> {
        let function = ctx.function;
        let name = || function.name.clone();

        let pageable = function
            .parameters
            .iter()
            .find(|p| role(p) == ParamRole::Pageable)
            .map(|p| p.name.clone());
        if pageable.is_some() != shape.page {
            return Err(Error::PaginationMismatch {
                function: name()
            });
        }

        let first = function.has_annotation(names::FIRST);
        if first && shape.is_many() {
            return Err(Error::FirstOnCollection {
                function: name()
            });
        }

        let literal = function
            .annotation(names::LIMIT)
            .map(|a| {
                let value = a.value().unwrap_or_default();
                value.trim().parse::<u64>().map_err(|_| Error::InvalidAnnotation {
                    function:   name(),
                    annotation: names::LIMIT.to_string(),
                    value:      value.to_string()
                })
            })
            .transpose()?;
        let parameter = function
            .parameters
            .iter()
            .find(|p| role(p) == ParamRole::Limit)
            .cloned();

        let sources: Vec<&str> = [
            (literal.is_some(), "Limit annotation"),
            (parameter.is_some(), "Limit parameter"),
            (first, "First"),
            (pageable.is_some(), "Pageable")
        ]
        .into_iter()
        .filter_map(|(present, source)| present.then_some(source))
        .collect();
        if sources.len() > 1 {
            return Err(Error::AmbiguousLimit {
                function: name(),
                sources:  sources.join(", ")
            });
        }

        let limit = match (literal, parameter) {
            (Some(n), _) => Some(Limit::Literal(n)),
            (None, Some(p)) => Some(Limit::Parameter(p)),
            (None, None) if first => Some(Limit::First),
            (None, None) if cap && !shape.is_many() && pageable.is_none() => {
                Some(Limit::Cap(ctx.config.single_result_cap))
            }
            (None, None) => None
        };

        let order_param = function
            .parameters
            .iter()
            .find(|p| role(p) == ParamRole::Order)
            .map(|p| p.name.clone());
        let mut order_by = function
            .annotation(names::ORDER_BY)
            .and_then(|a| a.value())
            .map(str::to_string);
        if order_param.is_some() && order_by.is_some() {
            tracing::warn!(
                function = %function.name,
                "OrderBy annotation ignored in favour of the Order parameter"
            );
            order_by = None;
        }

        Ok(Self {
            order_by,
            order_param,
            limit,
            pageable
        })
    }

    /// Append the suffixes to `sql`, binding parameters after every bind
    /// already in `binder`.
    pub(crate) fn apply(&self, ctx: &MethodContext<'_>, sql: &mut String, binder: &mut Binder) {
        if self.order_param.is_some() {
            sql.push(' ');
            sql.push_str(ORDER_BY_MARKER);
        } else if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        match &self.limit {
            Some(Limit::Literal(n)) => sql.push_str(&format!(" LIMIT {n}")),
            Some(Limit::Parameter(p)) => {
                let marker = binder.bind(QueryParameter::new(
                    vec![p.name.clone()],
                    p.ty.clone(),
                    ctx.catalog.resolve(&p.ty).map(|k| k.db_type)
                ));
                sql.push_str(&format!(" LIMIT {marker}"));
            }
            Some(Limit::First) => sql.push_str(" LIMIT 1"),
            Some(Limit::Cap(cap)) => sql.push_str(&format!(" LIMIT {cap}")),
            None => {}
        }

        if let Some(pageable) = &self.pageable {
            let slot = |field: &str| {
                QueryParameter::new(
                    vec![pageable.clone(), field.to_string()],
                    Type::named("i64"),
                    Some(DbType::BigInt)
                )
            };
            let limit = binder.bind(slot("limit"));
            let offset = binder.bind(slot("offset"));
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }
    }

    /// Record pagination and ordering on the compiled method.
    pub(crate) fn annotate(&self, method: &mut QueryMethod) {
        method.pagination = self.pageable.clone().map(|parameter| Pagination {
            parameter
        });
        method.order_parameter = self.order_param.clone();
    }
}
