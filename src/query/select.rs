// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Finder, count and exists queries.
//!
//! # Derived conditions
//!
//! Each value parameter is matched to a column, first by the column's
//! field path joined with `_`, then by column name, then by the path's last
//! element. A last element shared by several columns is an error.
//!
//!
//! | Parameter | Column | Condition |
//! |-----------|--------|-----------|
//! | list of the column type | any | `"col" = ANY(?)` |
//! | nullable | nullable | `"col" IS NOT DISTINCT FROM ?` |
//! | otherwise | | `"col" = ?` |
//!
//! A `Where` annotation replaces the derived conditions with its text.

use std::collections::HashSet;

use super::{
    Archetype, MethodContext, QueryMethod, QueryParameter,
    archetype::{ReturnShape, check_unused, lookup_value, reject_modifier_parameters, value_parameters},
    binder::Binder,
    modifiers::Modifiers,
    placeholders
};
use crate::{
    Error, Result,
    mapping::{ColumnMapping, ConstructorPlanner, ObjectConstructor},
    model::{Annotated, names}
};

/// Compile a finder, count or exists method.
pub(crate) fn compile(ctx: &MethodContext<'_>, archetype: Archetype) -> Result<QueryMethod> {
    let shape = ReturnShape::of(&ctx.function.return_type, ctx.catalog);
    let mut binder = Binder::new(ctx.config.placeholders);
    let table = ctx.table();

    let (mut sql, constructor, modifiers) = match archetype {
        Archetype::Count | Archetype::Exists => {
            reject_modifier_parameters(ctx)?;
            let constructor = ConstructorPlanner::new(ctx.catalog).scalar(&shape.element)?;
            let sql = match archetype {
                Archetype::Count => format!("SELECT count(*) FROM {table}"),
                _ => format!("SELECT EXISTS (SELECT * FROM {table}")
            };
            (sql, constructor, None)
        }
        _ => {
            let (columns, constructor) = rows(ctx, &shape)?;
            let modifiers = Modifiers::of(ctx, &shape, true)?;
            let list = columns
                .iter()
                .map(|c| ctx.config.quote(c))
                .collect::<Vec<_>>()
                .join(", ");
            (format!("SELECT {list} FROM {table}"), constructor, Some(modifiers))
        }
    };

    if let Some(condition) = condition(ctx, &mut binder)? {
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
    }
    if archetype == Archetype::Exists {
        sql.push(')');
    }
    if let Some(modifiers) = &modifiers {
        modifiers.apply(ctx, &mut sql, &mut binder);
    }

    let mut method = QueryMethod::new(ctx.function, archetype, sql);
    method.query_parameters = binder.finish();
    method.true_return_type = shape.element.clone();
    method.returns_collection = shape.is_many();
    method.returns_scalar = shape.scalar;
    method.constructor = Some(constructor);
    if let Some(modifiers) = &modifiers {
        modifiers.annotate(&mut method);
    }
    Ok(method)
}

/// Selected column names and the row plan for a finder's return type.
fn rows(ctx: &MethodContext<'_>, shape: &ReturnShape) -> Result<(Vec<String>, ObjectConstructor)> {
    let element = &shape.element;
    let unsupported = || Error::UnsupportedReturnType {
        function: ctx.name().to_string(),
        ty:       ctx.function.return_type.to_string()
    };

    if element.name() == &ctx.entity.name {
        let constructor = ctx.mapping.constructor.clone().ok_or_else(unsupported)?;
        let columns = ctx.mapping.columns.iter().map(|c| c.name().to_string()).collect();
        return Ok((columns, constructor));
    }
    if element.klass.is_composite() {
        let (constructor, used) = ConstructorPlanner::new(ctx.catalog).projection(
            ctx.name(),
            &element.klass,
            &ctx.mapping.columns
        )?;
        let columns = used.iter().map(|c| c.name().to_string()).collect();
        return Ok((columns, constructor));
    }
    Err(unsupported())
}

/// WHERE condition of a SELECT or field-based DELETE, if any.
pub(crate) fn condition(ctx: &MethodContext<'_>, binder: &mut Binder) -> Result<Option<String>> {
    if let Some(text) = ctx.function.annotation(names::WHERE).and_then(|a| a.value()) {
        let segments = placeholders::parse(text);
        let (sql, used) = placeholders::render(&segments, binder, ctx.name(), |name, in_clause| {
            lookup_value(ctx, name, in_clause)
        })?;
        check_unused(ctx, &used)?;
        return Ok(Some(sql));
    }
    derived(ctx, binder)
}

/// One equality condition per value parameter, joined by `AND`.
fn derived(ctx: &MethodContext<'_>, binder: &mut Binder) -> Result<Option<String>> {
    let mut conditions = Vec::new();
    let mut used = HashSet::new();
    for parameter in value_parameters(ctx) {
        let column = match find_column(&ctx.mapping.columns, &parameter.name).as_slice() {
            [column] => *column,
            [] => {
                return Err(Error::UnknownFinderParameter {
                    function: ctx.name().to_string(),
                    name:     parameter.name.clone()
                });
            }
            several => {
                return Err(Error::AmbiguousColumn {
                    function:   ctx.name().to_string(),
                    name:       parameter.name.clone(),
                    candidates: several.iter().map(|c| c.name().to_string()).collect()
                });
            }
        };
        let definition = &column.definition;
        let quoted = ctx.config.quote(&definition.name);
        let slot = QueryParameter::new(
            vec![parameter.name.clone()],
            parameter.ty.clone(),
            Some(definition.db_type.clone())
        );

        let condition = if ctx.catalog.is_collection(&parameter.ty) && !definition.db_type.is_json()
        {
            format!("{quoted} = ANY({})", binder.bind(slot.in_clause()))
        } else if definition.nullable && parameter.ty.is_nullable() {
            format!("{quoted} IS NOT DISTINCT FROM {}", binder.bind(slot))
        } else {
            format!("{quoted} = {}", binder.bind(slot))
        };
        conditions.push(condition);
        used.insert(parameter.name.clone());
    }
    check_unused(ctx, &used)?;
    Ok((!conditions.is_empty()).then(|| conditions.join(" AND ")))
}

/// Columns a finder parameter may refer to: the joined path, then the
/// column name, then the leaf field name. The first step with a match
/// decides.
pub(crate) fn find_column<'c>(columns: &'c [ColumnMapping], name: &str) -> Vec<&'c ColumnMapping> {
    let joined: Vec<_> = columns.iter().filter(|c| c.path.join("_") == name).collect();
    if !joined.is_empty() {
        return joined;
    }
    let named: Vec<_> = columns.iter().filter(|c| c.name() == name).collect();
    if !named.is_empty() {
        return named;
    }
    columns.iter().filter(|c| c.leaf() == name).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Config,
        catalog::TypeCatalog,
        config::PlaceholderStyle,
        mapping::TableMapping,
        model::{Annotation, Field, Klass, KlassFunction, Parameter, QualifiedName, Type}
    };

    fn person() -> Klass {
        let address = Klass::new(QualifiedName::simple("Address"))
            .with_field(Field::new("city", Type::named("String")));
        Klass::new(QualifiedName::simple("Person"))
            .with_field(
                Field::new("id", Type::named("i64")).with_annotation(Annotation::new(names::ID))
            )
            .with_field(Field::new("name", Type::named("String")))
            .with_field(Field::new("nickname", Type::named("String").nullable()))
            .with_field(Field::new("address", Type::new(address)))
    }

    fn people() -> Type {
        Type::named("Vec").with_parameters(vec![Type::new(person())])
    }

    fn compile_with(config: &Config, function: KlassFunction) -> Result<QueryMethod> {
        let catalog = TypeCatalog::new();
        let entity = person();
        let mapping = TableMapping::build(&entity, None, &catalog, config).unwrap();
        let ctx = MethodContext {
            config,
            catalog: &catalog,
            mapping: &mapping,
            entity: &entity,
            function: &function
        };
        let archetype = super::super::archetype::classify(&ctx);
        compile(&ctx, archetype)
    }

    fn compile_fn(function: KlassFunction) -> Result<QueryMethod> {
        compile_with(&Config::default(), function)
    }

    const COLUMNS: &str = "\"id\", \"name\", \"nickname\", \"address_city\"";

    #[test]
    fn find_all_has_no_limit() {
        let method = compile_fn(KlassFunction::new("find_all", people())).unwrap();
        assert_eq!(method.sql, format!("SELECT {COLUMNS} FROM \"person\""));
        assert!(method.returns_collection);
        assert!(method.query_parameters.is_empty());
    }

    #[test]
    fn single_finder_gets_cap() {
        let method = compile_fn(
            KlassFunction::new("find_by_id", Type::new(person()).nullable())
                .with_parameter(Parameter::new("id", Type::named("i64")))
        )
        .unwrap();
        assert_eq!(
            method.sql,
            format!("SELECT {COLUMNS} FROM \"person\" WHERE \"id\" = ? LIMIT 2")
        );
        assert!(method.is_single_result());
        assert_eq!(method.query_parameters[0].dotted(), "id");
    }

    #[test]
    fn nullable_and_list_conditions() {
        let method = compile_fn(
            KlassFunction::new("find_by_nickname_and_ids", people())
                .with_parameter(Parameter::new("nickname", Type::named("String").nullable()))
                .with_parameter(Parameter::new(
                    "id",
                    Type::named("Vec").with_parameters(vec![Type::named("i64")])
                ))
        )
        .unwrap();
        assert_eq!(
            method.sql,
            format!(
                "SELECT {COLUMNS} FROM \"person\" WHERE \"nickname\" IS NOT DISTINCT FROM ? AND \"id\" = ANY(?)"
            )
        );
        assert!(method.query_parameters[1].is_in_clause);
    }

    #[test]
    fn nested_column_by_leaf_or_path() {
        let method = compile_fn(
            KlassFunction::new("find_by_city", people())
                .with_parameter(Parameter::new("city", Type::named("String")))
        )
        .unwrap();
        assert!(method.sql.ends_with("WHERE \"address_city\" = ?"));

        let method = compile_fn(
            KlassFunction::new("find_by_address_city", people())
                .with_parameter(Parameter::new("address_city", Type::named("String")))
        )
        .unwrap();
        assert!(method.sql.ends_with("WHERE \"address_city\" = ?"));
    }

    #[test]
    fn shared_leaf_is_ambiguous() {
        let catalog = TypeCatalog::new();
        let address = Klass::new(QualifiedName::simple("Address"))
            .with_field(Field::new("city", Type::named("String")));
        let entity = Klass::new(QualifiedName::simple("Person"))
            .with_field(Field::new("id", Type::named("i64")).with_annotation(Annotation::new(names::ID)))
            .with_field(Field::new("home", Type::new(address.clone())))
            .with_field(Field::new("work", Type::new(address)));
        let mapping = TableMapping::build(&entity, None, &catalog, &Config::default()).unwrap();

        let column_names = |found: Vec<&ColumnMapping>| -> Vec<String> {
            found.iter().map(|c| c.name().to_string()).collect()
        };
        assert_eq!(column_names(find_column(&mapping.columns, "city")), vec!["home_city", "work_city"]);
        assert_eq!(column_names(find_column(&mapping.columns, "work_city")), vec!["work_city"]);

        let function = KlassFunction::new(
            "find_by_city",
            Type::named("Vec").with_parameters(vec![Type::new(entity.clone())])
        )
        .with_parameter(Parameter::new("city", Type::named("String")));
        let config = Config::default();
        let ctx = MethodContext {
            config:   &config,
            catalog:  &catalog,
            mapping:  &mapping,
            entity:   &entity,
            function: &function
        };
        let err = compile(&ctx, Archetype::Finder).unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousColumn { ref name, ref candidates, .. }
                if name == "city" && candidates.len() == 2
        ));
    }

    #[test]
    fn unknown_parameter_fails() {
        let err = compile_fn(
            KlassFunction::new("find_by_age", people())
                .with_parameter(Parameter::new("age", Type::named("i32")))
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownFinderParameter { ref name, .. } if name == "age"));
    }

    #[test]
    fn where_clause_with_in_and_numbered_markers() {
        let config = Config {
            placeholders: PlaceholderStyle::Numbered,
            ..Config::default()
        };
        let method = compile_with(
            &config,
            KlassFunction::new("search", people())
                .with_annotation(Annotation::valued(
                    names::WHERE,
                    "name = :name OR (nickname = :name AND id IN (:ids))"
                ))
                .with_parameter(Parameter::new("name", Type::named("String")))
                .with_parameter(Parameter::new(
                    "ids",
                    Type::named("Vec").with_parameters(vec![Type::named("i64")])
                ))
        )
        .unwrap();
        assert_eq!(
            method.sql,
            format!(
                "SELECT {COLUMNS} FROM \"person\" WHERE name = $1 OR (nickname = $1 AND id = ANY($2))"
            )
        );
        assert_eq!(method.query_parameters.len(), 2);
        assert!(method.query_parameters[1].is_in_clause);
    }

    #[test]
    fn where_clause_unused_parameter_fails() {
        let err = compile_fn(
            KlassFunction::new("search", people())
                .with_annotation(Annotation::valued(names::WHERE, "name = :name"))
                .with_parameter(Parameter::new("name", Type::named("String")))
                .with_parameter(Parameter::new("extra", Type::named("String")))
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnusedParameters { ref names, .. } if names == &["extra"]));
    }

    #[test]
    fn count_and_exists() {
        let count = compile_fn(
            KlassFunction::new("count_by_name", Type::named("i64"))
                .with_parameter(Parameter::new("name", Type::named("String")))
        )
        .unwrap();
        assert_eq!(count.sql, "SELECT count(*) FROM \"person\" WHERE \"name\" = ?");
        assert!(count.returns_scalar);
        assert!(!count.is_single_result());

        let exists = compile_fn(
            KlassFunction::new("exists_by_name", Type::named("bool"))
                .with_parameter(Parameter::new("name", Type::named("String")))
        )
        .unwrap();
        assert_eq!(
            exists.sql,
            "SELECT EXISTS (SELECT * FROM \"person\" WHERE \"name\" = ?)"
        );
    }

    #[test]
    fn first_limit_and_order() {
        let method = compile_fn(
            KlassFunction::new("find_by_name", Type::new(person()))
                .with_annotation(Annotation::new(names::FIRST))
                .with_annotation(Annotation::valued(names::ORDER_BY, "\"id\" DESC"))
                .with_parameter(Parameter::new("name", Type::named("String")))
        )
        .unwrap();
        assert!(method.sql.ends_with("WHERE \"name\" = ? ORDER BY \"id\" DESC LIMIT 1"));

        let method = compile_fn(
            KlassFunction::new("find_top", people())
                .with_annotation(Annotation::valued(names::LIMIT, "10"))
        )
        .unwrap();
        assert!(method.sql.ends_with("FROM \"person\" LIMIT 10"));

        let method = compile_fn(KlassFunction::new("find_some", people()).with_parameter(
            Parameter::new("n", Type::named("i64")).with_annotation(Annotation::new(names::LIMIT))
        ))
        .unwrap();
        assert!(method.sql.ends_with("FROM \"person\" LIMIT ?"));
        assert_eq!(method.query_parameters[0].dotted(), "n");
    }

    #[test]
    fn limit_conflicts() {
        let err = compile_fn(
            KlassFunction::new("find_some", people())
                .with_annotation(Annotation::valued(names::LIMIT, "5"))
                .with_parameter(
                    Parameter::new("n", Type::named("i64"))
                        .with_annotation(Annotation::new(names::LIMIT))
                )
        )
        .unwrap_err();
        assert!(matches!(err, Error::AmbiguousLimit { .. }));

        let err = compile_fn(
            KlassFunction::new("find_all_first", people())
                .with_annotation(Annotation::new(names::FIRST))
        )
        .unwrap_err();
        assert!(matches!(err, Error::FirstOnCollection { .. }));

        let err = compile_fn(
            KlassFunction::new("find_top", people())
                .with_annotation(Annotation::valued(names::LIMIT, "ten"))
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidAnnotation { ref value, .. } if value == "ten"));
    }

    #[test]
    fn pageable_and_order_parameter() {
        let page = Type::named("Page").with_parameters(vec![Type::new(person())]);
        let method = compile_fn(
            KlassFunction::new("find_by_name", page)
                .with_parameter(Parameter::new("name", Type::named("String")))
                .with_parameter(Parameter::new("order", Type::named("Order")))
                .with_parameter(Parameter::new("pageable", Type::named("Pageable")))
        )
        .unwrap();
        assert_eq!(
            method.sql,
            format!(
                "SELECT {COLUMNS} FROM \"person\" WHERE \"name\" = ? %orderBy LIMIT ? OFFSET ?"
            )
        );
        let binds: Vec<_> = method.query_parameters.iter().map(QueryParameter::dotted).collect();
        assert_eq!(binds, vec!["name", "pageable.limit", "pageable.offset"]);
        assert_eq!(method.order_parameter.as_deref(), Some("order"));
        assert_eq!(method.pagination.unwrap().parameter, "pageable");
        assert!(method.returns_collection);
    }

    #[test]
    fn pagination_mismatch() {
        let err = compile_fn(
            KlassFunction::new("find_page", people())
                .with_parameter(Parameter::new("pageable", Type::named("Pageable")))
        )
        .unwrap_err();
        assert!(matches!(err, Error::PaginationMismatch { .. }));

        let err = compile_fn(KlassFunction::new(
            "find_page",
            Type::named("Page").with_parameters(vec![Type::new(person())])
        ))
        .unwrap_err();
        assert!(matches!(err, Error::PaginationMismatch { .. }));
    }

    #[test]
    fn projection_selects_its_columns() {
        let name_only = Klass::new(QualifiedName::simple("NameOnly"))
            .with_field(Field::new("name", Type::named("String")))
            .with_field(Field::new("city", Type::named("String")));
        let method = compile_fn(KlassFunction::new(
            "find_names",
            Type::named("Vec").with_parameters(vec![Type::new(name_only)])
        ))
        .unwrap();
        assert_eq!(method.sql, "SELECT \"name\", \"address_city\" FROM \"person\"");
    }

    #[test]
    fn scalar_finder_is_unsupported() {
        let err = compile_fn(
            KlassFunction::new("find_name_by_id", Type::named("String"))
                .with_parameter(Parameter::new("id", Type::named("i64")))
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedReturnType { .. }));
    }
}
