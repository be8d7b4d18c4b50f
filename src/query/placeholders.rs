// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `:name` placeholders in `Where`, `Query` and `Statement` text.
//!
//! # Recognized syntax
//!
//! | Text | Meaning |
//! |------|---------|
//! | `:name` | bind parameter `name` |
//! | `x IN (:ids)` | `x = ANY(?)`, `ids` bound as an array |
//! | `value::text` | cast, left untouched |
//! | `':name'` | string literal, left untouched |
//! | `":name"` | quoted identifier, left untouched |
//!
//! `IN` is matched case-insensitively and only when the parentheses hold
//! the placeholder alone.

use std::collections::HashSet;

use super::{QueryParameter, binder::Binder};
use crate::{Error, Result};

/// Piece of scanned SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal text.
    Text(String),

    /// Placeholder; `in_clause` when it replaced an `IN (:name)` pattern.
    Param {
        name:      String,
        in_clause: bool
    }
}

/// Split SQL text into literal text and placeholders.
pub(crate) fn parse(sql: &str) -> Vec<Segment> {
    let chars: Vec<char> = sql.chars().collect();
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&q| q == c)
                    .map_or(chars.len(), |p| i + 1 + p + 1);
                text.extend(&chars[i..end]);
                i = end;
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                text.push_str("::");
                i += 2;
            }
            ':' if chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|n| !(n.is_ascii_alphanumeric() || *n == '_'))
                    .map_or(chars.len(), |p| start + p);
                let name: String = chars[start..end].iter().collect();

                match in_clause(&text, &chars[end..]) {
                    Some((prefix_len, consumed)) => {
                        text.truncate(prefix_len);
                        flush(&mut segments, &mut text);
                        segments.push(Segment::Param {
                            name,
                            in_clause: true
                        });
                        i = end + consumed;
                    }
                    None => {
                        flush(&mut segments, &mut text);
                        segments.push(Segment::Param {
                            name,
                            in_clause: false
                        });
                        i = end;
                    }
                }
            }
            _ => {
                text.push(c);
                i += 1;
            }
        }
    }
    flush(&mut segments, &mut text);
    segments
}

fn flush(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

/// Detect `IN (` before and `)` after a placeholder.
///
/// Returns the length `text` keeps (up to and including the space before
/// `IN`) and the number of characters to skip after the name.
fn in_clause(text: &str, rest: &[char]) -> Option<(usize, usize)> {
    let before_paren = text.trim_end().strip_suffix('(')?.trim_end();
    let upper = before_paren.to_ascii_uppercase();
    if !upper.ends_with("IN") {
        return None;
    }
    let keep = before_paren.len() - 2;
    if before_paren[..keep]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    let spaces = rest.iter().take_while(|c| c.is_whitespace()).count();
    (rest.get(spaces) == Some(&')')).then_some((keep, spaces + 1))
}

/// Placeholder names in order of first appearance.
#[cfg(test)]
pub(crate) fn names(segments: &[Segment]) -> Vec<&str> {
    let mut seen = HashSet::new();
    segments
        .iter()
        .filter_map(|s| match s {
            Segment::Param {
                name, ..
            } => seen.insert(name.as_str()).then_some(name.as_str()),
            Segment::Text(_) => None
        })
        .collect()
}

/// Render scanned text with bind markers.
///
/// `lookup` resolves a placeholder name to its bind parameter. Returns the
/// SQL and the set of names that were bound.
pub(crate) fn render<F>(
    segments: &[Segment],
    binder: &mut Binder,
    function: &str,
    lookup: F
) -> Result<(String, HashSet<String>)>
where
    F: Fn(&str, bool) -> Option<QueryParameter>
{
    let mut sql = String::new();
    let mut used = HashSet::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => sql.push_str(text),
            Segment::Param {
                name,
                in_clause
            } => {
                let param = lookup(name, *in_clause).ok_or_else(|| Error::UnknownParameter {
                    function: function.to_string(),
                    name:     name.clone()
                })?;
                let marker = binder.bind_named(name, param);
                if *in_clause {
                    sql.push_str(&format!("= ANY({marker})"));
                } else {
                    sql.push_str(&marker);
                }
                used.insert(name.clone());
            }
        }
    }
    Ok((sql, used))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::PlaceholderStyle, model::Type};

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    fn param(name: &str, in_clause: bool) -> Segment {
        Segment::Param {
            name: name.to_string(),
            in_clause
        }
    }

    #[test]
    fn splits_placeholders() {
        assert_eq!(
            parse("age > :min AND age < :max"),
            vec![
                text("age > "),
                param("min", false),
                text(" AND age < "),
                param("max", false),
            ]
        );
    }

    #[test]
    fn skips_casts_and_literals() {
        assert_eq!(
            parse("created::date = :day AND note <> ':day' AND \"a:b\" = 1"),
            vec![
                text("created::date = "),
                param("day", false),
                text(" AND note <> ':day' AND \"a:b\" = 1"),
            ]
        );
    }

    #[test]
    fn rewrites_in_clause() {
        assert_eq!(
            parse("name in ( :names ) AND id IN (:ids)"),
            vec![
                text("name "),
                param("names", true),
                text(" AND id "),
                param("ids", true),
            ]
        );
    }

    #[test]
    fn in_needs_word_boundary_and_sole_placeholder() {
        assert_eq!(
            parse("joIN (:x)"),
            vec![text("joIN ("), param("x", false), text(")")]
        );
        assert_eq!(
            parse("id IN (:a, :b)"),
            vec![
                text("id IN ("),
                param("a", false),
                text(", "),
                param("b", false),
                text(")"),
            ]
        );
    }

    #[test]
    fn first_appearance_order() {
        let segments = parse(":b = :a OR :b IS NULL");
        assert_eq!(names(&segments), vec!["b", "a"]);
    }

    #[test]
    fn render_binds_and_reports_unknown() {
        let segments = parse("id IN (:ids) AND name = :name");
        let lookup = |name: &str, in_clause: bool| {
            (name == "ids" || name == "name").then(|| {
                let mut p = QueryParameter::new(vec![name.to_string()], Type::named("i64"), None);
                p.is_in_clause = in_clause;
                p
            })
        };

        let mut binder = Binder::new(PlaceholderStyle::Numbered);
        let (sql, used) = render(&segments, &mut binder, "find", lookup).unwrap();
        assert_eq!(sql, "id = ANY($1) AND name = $2");
        assert_eq!(used.len(), 2);
        let bound = binder.finish();
        assert!(bound[0].is_in_clause);
        assert!(!bound[1].is_in_clause);

        let mut binder = Binder::new(PlaceholderStyle::Question);
        let err = render(&parse("x = :other"), &mut binder, "find", lookup).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter { ref name, .. } if name == "other"));
    }
}
