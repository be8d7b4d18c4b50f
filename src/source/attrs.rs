// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing.
//!
//! Key-value attributes (`#[table(...)]`, `#[column(...)]`,
//! `#[repository(...)]`) go through darling's [`FromMeta`]; marker and
//! single-literal attributes are read directly from the [`Meta`].
//!
//! | Attribute | Target | Annotation |
//! |-----------|--------|------------|
//! | `#[table(name, schema)]` | struct, trait | `Table` |
//! | `#[repository(database)]` | trait | `Repository` |
//! | `#[id]` | field | `Id` |
//! | `#[version]` | field | `Version` |
//! | `#[column(name, ty, schema)]` | field | `Column` |
//! | `#[where_clause("…")]` | method | `Where` |
//! | `#[query("…")]` | method | `Query` |
//! | `#[statement("…")]` | method | `Statement` |
//! | `#[limit(n)]` | method | `Limit(n)` |
//! | `#[limit]` | parameter | `Limit` |
//! | `#[first]` | method | `First` |
//! | `#[order_by("…")]` | method | `OrderBy` |
//! | `#[delete]` | method | `Delete` |
//! | `#[save]` | method | `Save` |
//! | `#[on_conflict_fail]` | method | `OnConflictFail` |
//!
//! Literal attributes also accept the `#[query = "…"]` form.

use darling::FromMeta;
use syn::{Attribute, LitInt, LitStr, Meta};

use crate::model::{Annotation, names};

/// `#[table(name = "...", schema = "...")]`
#[derive(Debug, Default, FromMeta)]
struct TableAttr {
    name:   Option<String>,
    schema: Option<String>
}

/// `#[column(name = "...", ty = "...", schema = "...")]`
#[derive(Debug, Default, FromMeta)]
struct ColumnAttr {
    name:   Option<String>,
    ty:     Option<String>,
    schema: Option<String>
}

/// `#[repository(database = "...")]`
#[derive(Debug, Default, FromMeta)]
struct RepositoryAttr {
    database: Option<String>
}

/// Parse a key-value attribute; the bare word form yields the defaults.
fn list_or_word<T: FromMeta + Default>(attr: &Attribute) -> darling::Result<T> {
    match &attr.meta {
        Meta::Path(_) => Ok(T::default()),
        meta => T::from_meta(meta)
    }
}

fn with_params<const N: usize>(
    mut annotation: Annotation,
    params: [(&str, Option<String>); N]
) -> Annotation {
    for (key, value) in params {
        if let Some(value) = value {
            annotation = annotation.with(key, value);
        }
    }
    annotation
}

/// String argument of `#[attr("…")]` or `#[attr = "…"]`.
fn text(attr: &Attribute) -> darling::Result<String> {
    match &attr.meta {
        Meta::NameValue(_) => String::from_meta(&attr.meta),
        _ => Ok(attr.parse_args::<LitStr>()?.value())
    }
}

/// Integer argument of `#[limit(n)]` or `#[limit = n]`.
fn count(attr: &Attribute) -> darling::Result<u64> {
    match &attr.meta {
        Meta::NameValue(_) => u64::from_meta(&attr.meta),
        _ => Ok(attr.parse_args::<LitInt>()?.base10_parse::<u64>()?)
    }
}

fn marker(attr: &Attribute, name: &str) -> darling::Result<Annotation> {
    attr.meta.require_path_only()?;
    Ok(Annotation::new(name))
}

fn ident(attr: &Attribute) -> Option<String> {
    attr.path().get_ident().map(ToString::to_string)
}

/// Annotations of a struct or trait.
pub(super) fn class_annotations(attrs: &[Attribute]) -> darling::Result<Vec<Annotation>> {
    let mut errors = darling::Error::accumulator();
    let mut out = Vec::new();
    for attr in attrs {
        let annotation = match ident(attr).as_deref() {
            Some("table") => errors.handle(list_or_word::<TableAttr>(attr)).map(|t| {
                with_params(
                    Annotation::new(names::TABLE),
                    [("name", t.name), ("schema", t.schema)]
                )
            }),
            Some("repository") => errors
                .handle(list_or_word::<RepositoryAttr>(attr))
                .map(|r| with_params(Annotation::new(names::REPOSITORY), [("database", r.database)])),
            _ => None
        };
        out.extend(annotation);
    }
    errors.finish_with(out)
}

/// Annotations of a struct field.
pub(super) fn field_annotations(attrs: &[Attribute]) -> darling::Result<Vec<Annotation>> {
    let mut errors = darling::Error::accumulator();
    let mut out = Vec::new();
    for attr in attrs {
        let annotation = match ident(attr).as_deref() {
            Some("id") => errors.handle(marker(attr, names::ID)),
            Some("version") => errors.handle(marker(attr, names::VERSION)),
            Some("column") => errors.handle(list_or_word::<ColumnAttr>(attr)).map(|c| {
                with_params(
                    Annotation::new(names::COLUMN),
                    [("name", c.name), ("type", c.ty), ("schema", c.schema)]
                )
            }),
            _ => None
        };
        out.extend(annotation);
    }
    errors.finish_with(out)
}

/// Annotations of a trait method.
pub(super) fn function_annotations(attrs: &[Attribute]) -> darling::Result<Vec<Annotation>> {
    let mut errors = darling::Error::accumulator();
    let mut out = Vec::new();
    for attr in attrs {
        let valued = |name: &'static str| text(attr).map(|t| Annotation::valued(name, t));
        let annotation = match ident(attr).as_deref() {
            Some("where_clause") => errors.handle(valued(names::WHERE)),
            Some("query") => errors.handle(valued(names::QUERY)),
            Some("statement") => errors.handle(valued(names::STATEMENT)),
            Some("order_by") => errors.handle(valued(names::ORDER_BY)),
            Some("limit") => errors
                .handle(count(attr))
                .map(|n| Annotation::valued(names::LIMIT, n.to_string())),
            Some("first") => errors.handle(marker(attr, names::FIRST)),
            Some("delete") => errors.handle(marker(attr, names::DELETE)),
            Some("save") => errors.handle(marker(attr, names::SAVE)),
            Some("on_conflict_fail") => errors.handle(marker(attr, names::ON_CONFLICT_FAIL)),
            _ => None
        };
        out.extend(annotation);
    }
    errors.finish_with(out)
}

/// Annotations of a method parameter.
pub(super) fn parameter_annotations(attrs: &[Attribute]) -> darling::Result<Vec<Annotation>> {
    let mut errors = darling::Error::accumulator();
    let mut out = Vec::new();
    for attr in attrs {
        if ident(attr).as_deref() == Some("limit") {
            out.extend(errors.handle(marker(attr, names::LIMIT)));
        }
    }
    errors.finish_with(out)
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::model::VALUE;

    #[test]
    fn table_and_repository() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[table(name = "users", schema = "auth")]),
            parse_quote!(#[repository(database = "audit")]),
            parse_quote!(#[derive(Debug)]),
        ];
        let annotations = class_annotations(&attrs).unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].param("name"), Some("users"));
        assert_eq!(annotations[0].param("schema"), Some("auth"));
        assert_eq!(annotations[1].param("database"), Some("audit"));
    }

    #[test]
    fn field_markers_and_column() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[id]),
            parse_quote!(#[column(name = "full_name", ty = "citext")]),
        ];
        let annotations = field_annotations(&attrs).unwrap();
        assert_eq!(annotations[0].name, names::ID);
        assert_eq!(annotations[1].param("name"), Some("full_name"));
        assert_eq!(annotations[1].param("type"), Some("citext"));
        assert_eq!(annotations[1].param("schema"), None);
    }

    #[test]
    fn function_literals() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[where_clause("age > :min")]),
            parse_quote!(#[order_by = "name DESC"]),
            parse_quote!(#[limit(5)]),
            parse_quote!(#[first]),
        ];
        let annotations = function_annotations(&attrs).unwrap();
        let values: Vec<_> = annotations
            .iter()
            .map(|a| (a.name.as_str(), a.params.get(VALUE).map(String::as_str)))
            .collect();
        assert_eq!(
            values,
            vec![
                (names::WHERE, Some("age > :min")),
                (names::ORDER_BY, Some("name DESC")),
                (names::LIMIT, Some("5")),
                (names::FIRST, None),
            ]
        );
    }

    #[test]
    fn malformed_attributes_are_collected() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[limit("ten")]),
            parse_quote!(#[first(now)]),
            parse_quote!(#[query(1)]),
        ];
        let err = function_annotations(&attrs).unwrap_err();
        assert_eq!(err.len(), 3);
    }

    #[test]
    fn unknown_column_key_is_rejected() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[column(kind = "x")])];
        assert!(field_annotations(&attrs).is_err());
    }

    #[test]
    fn parameter_limit() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[limit])];
        assert_eq!(parameter_annotations(&attrs).unwrap()[0].name, names::LIMIT);
    }
}
