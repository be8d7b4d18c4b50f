// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Archetype selection and signature analysis.

use std::collections::HashSet;

use super::{MethodContext, QueryMethodType, QueryParameter};
use crate::{
    Error, Result,
    catalog::{TypeCatalog, runtime},
    model::{Annotated, Parameter, Type, names}
};

/// Repository method shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// INSERT or upsert of one entity or a list of them.
    Save,
    /// DELETE guarded by id and version of one entity or a list of them.
    DeleteByEntity,
    /// DELETE with one equality condition per parameter.
    DeleteByFields,
    /// DELETE with a `Where` condition.
    DeleteWhere,
    /// SELECT of rows, derived or with a `Where` condition.
    Finder,
    /// `SELECT count(*)`.
    Count,
    /// `SELECT EXISTS (…)`.
    Exists,
    /// Verbatim `Query` or `Statement` text.
    Custom
}

/// Select the archetype of a function.
pub(crate) fn classify(ctx: &MethodContext<'_>) -> Archetype {
    let function = ctx.function;
    if function.has_annotation(names::QUERY) || function.has_annotation(names::STATEMENT) {
        return Archetype::Custom;
    }

    let save = function.has_annotation(names::SAVE)
        || (!function.has_annotation(names::DELETE) && function.name.starts_with("save"));
    if save {
        return Archetype::Save;
    }

    if function.has_annotation(names::DELETE) || function.name.starts_with("delete") {
        if function.has_annotation(names::WHERE) {
            return Archetype::DeleteWhere;
        }
        let values: Vec<_> = value_parameters(ctx).collect();
        if let [single] = values.as_slice()
            && entity_parameter(ctx, &single.ty).is_some()
        {
            return Archetype::DeleteByEntity;
        }
        return Archetype::DeleteByFields;
    }

    let shape = ReturnShape::of(&function.return_type, ctx.catalog);
    if !shape.collection && !shape.page {
        match ctx.catalog.resolve(&shape.element).map(|known| known.accessor) {
            Some("i32" | "i64") => return Archetype::Count,
            Some("bool") => return Archetype::Exists,
            _ => {}
        }
    }
    Archetype::Finder
}

/// Role of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamRole {
    /// Ordinary value bound into conditions.
    Value,
    /// `Pageable`, expands to `LIMIT ? OFFSET ?`.
    Pageable,
    /// `Order`, replaces the ORDER BY marker at run time.
    Order,
    /// `Limit`-annotated, bound to `LIMIT ?`.
    Limit
}

pub(crate) fn role(parameter: &Parameter) -> ParamRole {
    if runtime::is(parameter.ty.name(), runtime::PAGEABLE) {
        ParamRole::Pageable
    } else if runtime::is(parameter.ty.name(), runtime::ORDER) {
        ParamRole::Order
    } else if parameter.has_annotation(names::LIMIT) {
        ParamRole::Limit
    } else {
        ParamRole::Value
    }
}

/// Parameters bound into conditions, in declaration order.
pub(crate) fn value_parameters<'a>(
    ctx: &MethodContext<'a>
) -> impl Iterator<Item = &'a Parameter> + use<'a> {
    ctx.function
        .parameters
        .iter()
        .filter(|p| role(p) == ParamRole::Value)
}

/// Execution type when `ty` is the entity or a list of it.
pub(crate) fn entity_parameter(ctx: &MethodContext<'_>, ty: &Type) -> Option<QueryMethodType> {
    let is_entity = |t: &Type| t.name() == &ctx.entity.name;
    if is_entity(ty) {
        Some(QueryMethodType::Single)
    } else if ctx.catalog.is_collection(ty) && ty.element().is_some_and(is_entity) {
        Some(QueryMethodType::Batch)
    } else {
        None
    }
}

/// Bind parameter for a `:name` placeholder.
pub(crate) fn lookup_value(
    ctx: &MethodContext<'_>,
    name: &str,
    in_clause: bool
) -> Option<QueryParameter> {
    let parameter = value_parameters(ctx).find(|p| p.name == name)?;
    let bound = if in_clause {
        parameter.ty.element().unwrap_or(&parameter.ty)
    } else {
        &parameter.ty
    };
    let db_type = ctx.catalog.resolve(bound).map(|k| k.db_type);
    let param = QueryParameter::new(vec![parameter.name.clone()], parameter.ty.clone(), db_type);
    Some(if in_clause { param.in_clause() } else { param })
}

/// Fail when a value parameter was never bound.
pub(crate) fn check_unused(ctx: &MethodContext<'_>, used: &HashSet<String>) -> Result<()> {
    let unused: Vec<String> = value_parameters(ctx)
        .filter(|p| !used.contains(&p.name))
        .map(|p| p.name.clone())
        .collect();
    if unused.is_empty() {
        Ok(())
    } else {
        Err(Error::UnusedParameters {
            function: ctx.name().to_string(),
            names:    unused
        })
    }
}

/// Fail when the function declares parameters other than values.
pub(crate) fn reject_modifier_parameters(ctx: &MethodContext<'_>) -> Result<()> {
    let extra: Vec<String> = ctx
        .function
        .parameters
        .iter()
        .filter(|p| role(p) != ParamRole::Value)
        .map(|p| p.name.clone())
        .collect();
    if extra.is_empty() {
        Ok(())
    } else {
        Err(Error::UnusedParameters {
            function: ctx.name().to_string(),
            names:    extra
        })
    }
}

/// Declared return type broken down for planning.
#[derive(Debug, Clone)]
pub(crate) struct ReturnShape {
    /// Row type: element of a list or page, else the declared type.
    pub(crate) element:    Type,
    /// Declared as a list.
    pub(crate) collection: bool,
    /// Declared as `Page<T>`.
    pub(crate) page:       bool,
    /// Element maps to one column.
    pub(crate) scalar:     bool,
    /// Element is `()`.
    pub(crate) unit:       bool
}

impl ReturnShape {
    pub(crate) fn of(ty: &Type, catalog: &TypeCatalog) -> Self {
        let page = runtime::is(ty.name(), runtime::PAGE);
        let collection = !page && catalog.is_collection(ty);
        let element = if page || collection {
            ty.element().cloned().unwrap_or_else(Type::unit)
        } else {
            ty.clone()
        };
        let unit = TypeCatalog::is_unit(element.name());
        let scalar = !unit && (element.klass.is_enum || catalog.resolve(&element).is_some());
        Self {
            element,
            collection,
            page,
            scalar,
            unit
        }
    }

    /// List or page of rows.
    pub(crate) fn is_many(&self) -> bool {
        self.collection || self.page
    }
}
