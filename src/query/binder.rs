// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Bind slot allocation.
//!
//! Every value that reaches the database goes through a [`Binder`], which
//! records the [`QueryParameter`] in execution order and returns the marker
//! to splice into the SQL text.
//!
//! | Style | First bind | Repeated named bind |
//! |-------|------------|---------------------|
//! | `Question` | `?` | new `?`, new slot |
//! | `Numbered` | `$1` | same `$n`, no new slot |

use std::collections::HashMap;

use super::QueryParameter;
use crate::config::PlaceholderStyle;

/// Collects bind slots while SQL text is assembled.
#[derive(Debug)]
pub(crate) struct Binder {
    style:  PlaceholderStyle,
    params: Vec<QueryParameter>,
    named:  HashMap<String, usize>
}

impl Binder {
    pub(crate) fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            params: Vec::new(),
            named: HashMap::new()
        }
    }

    /// Allocate a fresh slot.
    pub(crate) fn bind(&mut self, param: QueryParameter) -> String {
        self.params.push(param);
        self.marker(self.params.len())
    }

    /// Allocate a slot for a named value; numbered markers reuse the slot of
    /// an earlier bind with the same name.
    pub(crate) fn bind_named(&mut self, name: &str, param: QueryParameter) -> String {
        if self.style == PlaceholderStyle::Numbered
            && let Some(&index) = self.named.get(name)
        {
            return self.marker(index);
        }
        let marker = self.bind(param);
        self.named.insert(name.to_string(), self.params.len());
        marker
    }

    fn marker(&self, index: usize) -> String {
        match self.style {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${index}")
        }
    }

    /// Bind slots in execution order.
    pub(crate) fn finish(self) -> Vec<QueryParameter> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Type;

    fn param(name: &str) -> QueryParameter {
        QueryParameter::new(vec![name.to_string()], Type::named("i64"), None)
    }

    #[test]
    fn question_marks_bind_every_occurrence() {
        let mut binder = Binder::new(PlaceholderStyle::Question);
        assert_eq!(binder.bind_named("a", param("a")), "?");
        assert_eq!(binder.bind_named("a", param("a")), "?");
        assert_eq!(binder.bind(param("b")), "?");
        assert_eq!(binder.finish().len(), 3);
    }

    #[test]
    fn numbered_markers_reuse_named_slots() {
        let mut binder = Binder::new(PlaceholderStyle::Numbered);
        assert_eq!(binder.bind_named("a", param("a")), "$1");
        assert_eq!(binder.bind(param("b")), "$2");
        assert_eq!(binder.bind_named("a", param("a")), "$1");
        assert_eq!(binder.bind(param("c")), "$3");
        let slots: Vec<_> = binder.finish().into_iter().map(|p| p.dotted()).collect();
        assert_eq!(slots, vec!["a", "b", "c"]);
    }
}
