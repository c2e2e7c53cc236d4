use super::helpers::SUITE_RUN_CALL;
use super::identifiers::first_identifier;
use crate::extractors::base::{FunctionDecl, SourceUnit};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tree_sitter::Node;

/// First identifiers of the suite instances passed to `suite.Run(t, x)` calls
/// inside `decl`, de-duplicated by identifier text in call order
pub fn find_suite_run_types<'a>(unit: &'a SourceUnit, decl: &FunctionDecl<'a>) -> Vec<Node<'a>> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for call in unit.find_nodes_by_type(&decl.node, "call_expression") {
        let Some(function) = call.child_by_field_name("function") else {
            continue;
        };
        if unit.get_compact_text(&function) != SUITE_RUN_CALL {
            continue;
        }
        let Some(arguments) = call.child_by_field_name("arguments") else {
            continue;
        };
        let args = unit.named_children_without_comments(&arguments);
        if args.len() != 2 {
            continue;
        }
        let Some(ident) = first_identifier(unit, args[1]) else {
            continue;
        };
        if seen.insert(unit.get_node_text(&ident)) {
            result.push(ident);
        }
    }

    result
}

/// Per-file record of discovered test names and of which root tests run which suite
///
/// Owned by a single extraction call; never shared between files.
#[derive(Debug, Default)]
pub struct Tracker {
    result: Vec<String>,
    seen_tests: HashSet<String>,
    /// suite type name -> root tests that run it
    suite_runners: BTreeMap<String, BTreeSet<String>>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_test(&mut self, name: String) {
        if self.seen_tests.insert(name.clone()) {
            self.result.push(name);
        }
    }

    pub fn suite_ran_by_test(&mut self, suite_type_name: &str, test_name: &str) {
        self.suite_runners
            .entry(suite_type_name.to_string())
            .or_default()
            .insert(test_name.to_string());
    }

    pub fn who_ran_suite_type(&self, suite_type_name: &str) -> Vec<String> {
        self.suite_runners
            .get(suite_type_name)
            .map(|runners| runners.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Sorted, de-duplicated names
    pub fn into_seen_tests(mut self) -> Vec<String> {
        self.result.sort();
        self.result
    }
}
