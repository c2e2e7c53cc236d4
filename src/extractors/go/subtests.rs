//! Pattern strategy: dynamically named sub-tests.
//!
//! `t.Run("works", ...)` inside `TestWeb` yields `TestWeb/works`. A table
//! loop `for _, tc := range tests { t.Run(tc.name, ...) }` yields one name
//! per row of `tests` that sets `name` to a string literal.

use super::classify::classify;
use super::identifiers::TypeResolver;
use crate::error::ExtractError;
use crate::extractors::base::{SourceUnit, TestKind};
use crate::query::{CaptureSet, T_RUN_STRING_LITERAL, T_RUN_STRUCT_LITERAL};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;
use tree_sitter::Node;

/// Sub-test name as `go test -run` expects it: spaces become `_`, quotes go
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '"')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Sorted `Parent/child` names found by the sub-test patterns
///
/// Only root tests can parent a sub-test. Unlike the AST strategy this
/// tolerates syntax errors elsewhere in the file.
pub fn pattern_test_names(file_path: &str, content: &str) -> Result<Vec<String>, ExtractError> {
    let unit = SourceUnit::parse(file_path, content)?;
    let source = unit.content.as_bytes();
    let root = unit.root();
    let root_tests: HashSet<usize> = unit
        .top_level_functions()
        .iter()
        .filter(|decl| classify(decl) == TestKind::RootTest)
        .map(|decl| decl.node.id())
        .collect();
    let in_root_test = |hit: &CaptureSet| {
        hit.node("func.name")
            .and_then(|name| name.parent())
            .is_some_and(|decl| root_tests.contains(&decl.id()))
    };
    let mut names = BTreeSet::new();

    for hit in T_RUN_STRING_LITERAL.scan(root, source) {
        if !in_root_test(&hit) {
            continue;
        }
        if let (Some(parent), Some(literal)) = (hit.text("func.name"), hit.text("test.name")) {
            insert_subtest(&mut names, parent, literal);
        }
    }

    let resolver = TypeResolver::new(&unit);
    for hit in T_RUN_STRUCT_LITERAL.scan(root, source) {
        if !in_root_test(&hit) {
            continue;
        }
        let (Some(parent), Some(table), Some(field)) =
            (hit.text("func.name"), hit.node("table"), hit.text("field.name"))
        else {
            continue;
        };
        for literal in table_field_values(&unit, &resolver, table, field) {
            insert_subtest(&mut names, parent, &literal);
        }
    }

    debug!("Pattern strategy found {} names in {}", names.len(), file_path);
    Ok(names.into_iter().collect())
}

fn insert_subtest(names: &mut BTreeSet<String>, parent: &str, literal: &str) {
    let literal = literal
        .strip_prefix('`')
        .and_then(|raw| raw.strip_suffix('`'))
        .unwrap_or(literal);
    let child = sanitize(literal);
    if !child.is_empty() {
        names.insert(format!("{}/{}", parent, child));
    }
}

/// String literals assigned to `field` in each row of the ranged table
fn table_field_values<'a>(
    unit: &'a SourceUnit,
    resolver: &TypeResolver<'a>,
    table: Node<'a>,
    field: &str,
) -> Vec<String> {
    let Some(literal) = table_literal(unit, resolver, table) else {
        return Vec::new();
    };
    let Some(body) = literal.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for element in unit.named_children_without_comments(&body) {
        let Some(row) = row_body(element) else {
            continue;
        };
        for pair in unit.named_children_without_comments(&row) {
            if pair.kind() != "keyed_element" {
                continue;
            }
            let parts = unit.named_children_without_comments(&pair);
            let (Some(key), Some(value)) = (parts.first(), parts.last()) else {
                continue;
            };
            if parts.len() < 2 || unit.get_compact_text(key) != field {
                continue;
            }
            let value = unwrap_element(*value);
            if matches!(value.kind(), "interpreted_string_literal" | "raw_string_literal") {
                values.push(unit.get_node_text(&value));
            }
        }
    }
    values
}

/// The composite literal a range loop iterates, inline or through a variable
fn table_literal<'a>(
    unit: &'a SourceUnit,
    resolver: &TypeResolver<'a>,
    table: Node<'a>,
) -> Option<Node<'a>> {
    let expr = match table.kind() {
        "identifier" => resolver.initializer(table, &unit.get_node_text(&table))?,
        _ => table,
    };
    let expr = strip_wrappers(expr)?;
    (expr.kind() == "composite_literal").then_some(expr)
}

/// `&x` and `(x)` -> `x`
fn strip_wrappers(mut expr: Node) -> Option<Node> {
    loop {
        expr = match expr.kind() {
            "unary_expression" => expr.child_by_field_name("operand")?,
            "parenthesized_expression" => expr.named_child(0)?,
            _ => return Some(expr),
        };
    }
}

/// `literal_element` wraps the actual expression in recent grammars
fn unwrap_element(node: Node) -> Node {
    if node.kind() == "literal_element" {
        node.named_child(0).unwrap_or(node)
    } else {
        node
    }
}

/// Field list of one table row: `{...}`, `T{...}` or `&T{...}`
fn row_body(element: Node) -> Option<Node> {
    let element = strip_wrappers(unwrap_element(element))?;
    match element.kind() {
        "literal_value" => Some(element),
        "composite_literal" => element.child_by_field_name("body"),
        _ => None,
    }
}
