//! Rendering of search predicates into Meilisearch filter expressions.
//!
//! The free-text clause becomes the `q` parameter; every other clause becomes
//! one term of an AND-joined filter string. String literals are always quoted
//! and escaped so a value can't terminate its literal and inject operators.

use super::models::{SearchBody, HIGHLIGHT_ATTRIBUTES, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use crate::search::{Clause, FilterValue, Op, Predicate};

pub fn build_search_body(predicate: &Predicate, limit: u32) -> SearchBody {
    SearchBody {
        q: predicate.text().map(str::to_string),
        filter: render_filter(predicate),
        limit,
        attributes_to_highlight: HIGHLIGHT_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        highlight_pre_tag: HIGHLIGHT_PRE_TAG.to_string(),
        highlight_post_tag: HIGHLIGHT_POST_TAG.to_string(),
    }
}

/// AND-joined filter expression, or `None` when there is nothing to filter on.
pub fn render_filter(predicate: &Predicate) -> Option<String> {
    let terms: Vec<String> = predicate.filters().map(render_clause).collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" AND "))
    }
}

fn render_clause(clause: &Clause) -> String {
    let path = clause.field.document_path();
    match (clause.op, &clause.value) {
        (Op::Has, value) => format!("{} IN [{}]", path, literal(value)),
        (Op::Eq, value) => format!("{} = {}", path, literal(value)),
        (Op::Contains, value) => format!("{} CONTAINS {}", path, literal(value)),
    }
}

fn literal(value: &FilterValue) -> String {
    match value {
        FilterValue::Int(v) => v.to_string(),
        FilterValue::Text(v) => quote(v),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
