// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust source front end.
//!
//! Reads entity structs and repository traits from Rust source and builds
//! the [`Klass`] model the compiler works on.
//!
//! # Example
//!
//! ```rust
//! use repogen::{Compiler, Config, source};
//!
//! let model = source::parse_str(r#"
//!     #[table(name = "users")]
//!     struct User {
//!         #[id]
//!         id: i64,
//!         email: String,
//!     }
//!
//!     trait UserRepository: Repository<User> {
//!         fn find_by_email(&self, email: String) -> Option<User>;
//!     }
//! "#).unwrap();
//!
//! let databases = Compiler::new(Config::default())
//!     .compile_all(&model.repositories)
//!     .unwrap();
//! let users = databases[0].repository("UserRepository").unwrap();
//! assert_eq!(
//!     users.method("find_by_email").unwrap().sql,
//!     "SELECT \"id\", \"email\" FROM \"users\" WHERE \"email\" = ? LIMIT 2"
//! );
//! ```
//!
//! # Architecture
//!
//! ```text
//! source.rs (items → SourceModel)
//! ├── attrs.rs  - #[table], #[id], #[query(..)] and friends → Annotations
//! └── types.rs  - syn::Type → model Type, local struct expansion
//! ```
//!
//! Inline modules are searched; names stay unqualified.

mod attrs;
mod types;

use syn::{FnArg, Item, ItemTrait, Pat, ReturnType, TraitItem, TraitItemFn, TypeParamBound};

use self::types::Declarations;
use crate::{
    Result,
    model::{Klass, KlassFunction, Parameter, QualifiedName, Type}
};

/// Classes and repositories found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModel {
    /// Structs and enums in declaration order.
    pub klasses: Vec<Klass>,

    /// Repository traits in declaration order.
    pub repositories: Vec<Klass>
}

impl SourceModel {
    /// Find a class by simple name.
    #[must_use]
    pub fn klass(&self, name: &str) -> Option<&Klass> {
        self.klasses.iter().find(|k| k.name.name == name)
    }

    /// Find a repository by simple name.
    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&Klass> {
        self.repositories.iter().find(|k| k.name.name == name)
    }
}

/// Parse Rust source text.
///
/// # Errors
///
/// [`Error::Source`](crate::Error::Source) for syntax errors and malformed
/// attributes.
pub fn parse_str(source: &str) -> Result<SourceModel> {
    let file = syn::parse_file(source).map_err(darling::Error::from)?;
    parse_file(&file)
}

/// Build the model of a parsed file.
///
/// Traits become repositories when they extend `Repository<E>` or carry
/// `#[repository]`.
///
/// # Errors
///
/// [`Error::Source`](crate::Error::Source) with every malformed attribute
/// or unsupported type found.
pub fn parse_file(file: &syn::File) -> Result<SourceModel> {
    let mut items = Vec::new();
    collect(&file.items, &mut items);

    let mut declarations = Declarations::default();
    for &item in &items {
        match item {
            Item::Struct(item) => declarations.add_struct(item),
            Item::Enum(item) => declarations.add_enum(item),
            _ => {}
        }
    }

    let mut errors = darling::Error::accumulator();
    let mut model = SourceModel::default();
    for &item in &items {
        match item {
            Item::Struct(item) => {
                model.klasses.extend(errors.handle(declarations.structure(item)));
            }
            Item::Enum(item) => model.klasses.push(Declarations::enumeration(item)),
            Item::Trait(item) if is_repository(item) => {
                model.repositories.extend(errors.handle(repository(&declarations, item)));
            }
            _ => {}
        }
    }
    let model = errors.finish_with(model)?;

    tracing::debug!(
        klasses = model.klasses.len(),
        repositories = model.repositories.len(),
        "source parsed"
    );
    Ok(model)
}

fn collect<'a>(items: &'a [Item], out: &mut Vec<&'a Item>) {
    for item in items {
        match item {
            Item::Mod(module) => {
                if let Some((_, nested)) = &module.content {
                    collect(nested, out);
                }
            }
            item => out.push(item)
        }
    }
}

/// `Repository<E>` supertrait argument.
fn repository_entity(item: &ItemTrait) -> Option<&syn::Type> {
    item.supertraits.iter().find_map(|bound| {
        let TypeParamBound::Trait(bound) = bound else {
            return None;
        };
        let last = bound.path.segments.last()?;
        if last.ident != "Repository" {
            return None;
        }
        let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
            return None;
        };
        args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(ty),
            _ => None
        })
    })
}

fn is_repository(item: &ItemTrait) -> bool {
    repository_entity(item).is_some() || item.attrs.iter().any(|a| a.path().is_ident("repository"))
}

fn repository(declarations: &Declarations<'_>, item: &ItemTrait) -> darling::Result<Klass> {
    let mut errors = darling::Error::accumulator();
    let mut klass = Klass::interface(QualifiedName::simple(item.ident.to_string()));
    klass.annotations = errors
        .handle(attrs::class_annotations(&item.attrs))
        .unwrap_or_default();
    if let Some(entity) = repository_entity(item) {
        klass.superclass_parameter = errors.handle(declarations.ty(entity)).map(Box::new);
    }

    for member in &item.items {
        if let TraitItem::Fn(method) = member {
            klass.functions.extend(errors.handle(function(declarations, method)));
        }
    }
    errors.finish_with(klass)
}

fn function(declarations: &Declarations<'_>, method: &TraitItemFn) -> darling::Result<KlassFunction> {
    let mut errors = darling::Error::accumulator();
    let signature = &method.sig;

    let return_type = match &signature.output {
        ReturnType::Default => Type::unit(),
        ReturnType::Type(_, ty) => errors.handle(declarations.ty(unwrap_result(ty))).unwrap_or_else(Type::unit)
    };
    let mut function = KlassFunction::new(signature.ident.to_string(), return_type);
    function.is_abstract = method.default.is_none();
    function.annotations = errors
        .handle(attrs::function_annotations(&method.attrs))
        .unwrap_or_default();

    for input in &signature.inputs {
        let FnArg::Typed(argument) = input else {
            continue;
        };
        let Pat::Ident(pattern) = argument.pat.as_ref() else {
            errors.push(
                darling::Error::custom("parameters must be plain identifiers").with_span(&argument.pat)
            );
            continue;
        };
        let ty = errors.handle(declarations.ty(&argument.ty));
        let annotations = errors.handle(attrs::parameter_annotations(&argument.attrs));
        if let (Some(ty), Some(annotations)) = (ty, annotations) {
            let mut parameter = Parameter::new(pattern.ident.to_string(), ty);
            parameter.annotations = annotations;
            function.parameters.push(parameter);
        }
    }
    errors.finish_with(function)
}

/// `T` of `Result<T, E>`, else the type itself.
fn unwrap_result(ty: &syn::Type) -> &syn::Type {
    if let syn::Type::Path(path) = ty
        && let Some(last) = path.path.segments.last()
        && last.ident == "Result"
        && let syn::PathArguments::AngleBracketed(args) = &last.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return inner;
    }
    ty
}
