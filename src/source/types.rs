// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust types to model types.
//!
//! | Rust | Model |
//! |------|-------|
//! | `Option<T>` | `T`, nullable |
//! | `&T`, `Box<T>`, `Rc<T>`, `Arc<T>` | `T` |
//! | `[T]`, `[T; N]` | `Vec<T>` |
//! | `()` | unit |
//! | struct declared in the file | class with its fields |
//! | fieldless enum declared in the file | enum class |
//! | any other path | class named by the path, resolved by the catalog |
//!
//! A struct that refers back to one still being expanded is kept as a
//! name-only class.

use std::collections::HashMap;

use syn::{Fields, GenericArgument, ItemEnum, ItemStruct, PathArguments};

use super::attrs;
use crate::model::{Field, Klass, QualifiedName, Type};

/// Struct and enum declarations visible to type resolution.
#[derive(Debug, Default)]
pub(super) struct Declarations<'a> {
    structs: HashMap<String, &'a ItemStruct>,
    enums:   HashMap<String, &'a ItemEnum>
}

impl<'a> Declarations<'a> {
    pub(super) fn add_struct(&mut self, item: &'a ItemStruct) {
        self.structs.insert(item.ident.to_string(), item);
    }

    pub(super) fn add_enum(&mut self, item: &'a ItemEnum) {
        self.enums.insert(item.ident.to_string(), item);
    }

    /// Class of a declared struct with its fields expanded.
    pub(super) fn structure(&self, item: &ItemStruct) -> darling::Result<Klass> {
        self.expand(item, &mut Vec::new())
    }

    /// Class of a declared enum.
    pub(super) fn enumeration(item: &ItemEnum) -> Klass {
        let name = QualifiedName::simple(item.ident.to_string());
        if item.variants.iter().all(|v| matches!(v.fields, Fields::Unit)) {
            Klass::enumeration(name)
        } else {
            Klass::new(name)
        }
    }

    /// Model type of a Rust type.
    pub(super) fn ty(&self, ty: &syn::Type) -> darling::Result<Type> {
        self.resolve(ty, &mut Vec::new())
    }

    fn expand(&self, item: &ItemStruct, stack: &mut Vec<String>) -> darling::Result<Klass> {
        let name = item.ident.to_string();
        let mut klass = Klass::new(QualifiedName::simple(name.clone()));
        klass.annotations = attrs::class_annotations(&item.attrs)?;

        let named = match &item.fields {
            Fields::Named(named) => named,
            Fields::Unit => return Ok(klass),
            Fields::Unnamed(_) => {
                return Err(darling::Error::custom("tuple structs cannot be mapped")
                    .with_span(&item.ident));
            }
        };

        stack.push(name);
        let mut errors = darling::Error::accumulator();
        for field in &named.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let ty = errors.handle(self.resolve(&field.ty, stack));
            let annotations = errors.handle(attrs::field_annotations(&field.attrs));
            if let (Some(ty), Some(annotations)) = (ty, annotations) {
                let mut field = Field::new(ident.to_string(), ty);
                field.annotations = annotations;
                klass.fields.push(field);
            }
        }
        stack.pop();
        errors.finish_with(klass)
    }

    fn resolve(&self, ty: &syn::Type, stack: &mut Vec<String>) -> darling::Result<Type> {
        match ty {
            syn::Type::Paren(inner) => self.resolve(&inner.elem, stack),
            syn::Type::Group(inner) => self.resolve(&inner.elem, stack),
            syn::Type::Reference(reference) => self.resolve(&reference.elem, stack),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(Type::unit()),
            syn::Type::Slice(slice) => self.list(&slice.elem, stack),
            syn::Type::Array(array) => self.list(&array.elem, stack),
            syn::Type::Path(path) if path.qself.is_none() => self.path(&path.path, stack),
            other => Err(darling::Error::custom("unsupported type").with_span(other))
        }
    }

    fn list(&self, element: &syn::Type, stack: &mut Vec<String>) -> darling::Result<Type> {
        Ok(Type::named("Vec").with_parameters(vec![self.resolve(element, stack)?]))
    }

    fn path(&self, path: &syn::Path, stack: &mut Vec<String>) -> darling::Result<Type> {
        let Some(last) = path.segments.last() else {
            return Err(darling::Error::custom("empty type path").with_span(path));
        };
        let arguments: Vec<&syn::Type> = match &last.arguments {
            PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(ty),
                    _ => None
                })
                .collect(),
            _ => Vec::new()
        };

        if let [inner] = arguments.as_slice() {
            match last.ident.to_string().as_str() {
                "Option" => return Ok(self.resolve(inner, stack)?.nullable()),
                "Box" | "Rc" | "Arc" => return self.resolve(inner, stack),
                _ => {}
            }
        }

        let parameters = arguments
            .into_iter()
            .map(|arg| self.resolve(arg, stack))
            .collect::<darling::Result<Vec<_>>>()?;
        let joined = path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::");

        let klass = if path.segments.len() == 1 {
            self.local(&joined, stack)?
        } else {
            None
        };
        let klass = klass.unwrap_or_else(|| Klass::new(QualifiedName::from_path(&joined)));
        Ok(Type::new(klass).with_parameters(parameters))
    }

    fn local(&self, name: &str, stack: &mut Vec<String>) -> darling::Result<Option<Klass>> {
        if stack.iter().any(|s| s == name) {
            return Ok(Some(Klass::new(QualifiedName::simple(name))));
        }
        if let Some(item) = self.structs.get(name) {
            return self.expand(item, stack).map(Some);
        }
        Ok(self.enums.get(name).map(|item| Self::enumeration(item)))
    }
}
