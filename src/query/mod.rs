//! Syntax matcher: tree-sitter queries gated by the crate's predicate interpreter.
//!
//! Patterns are embedded in the binary and compiled once per process.

pub mod predicate;

use crate::error::PatternError;
use crate::language::go_language;
use predicate::{predicate_steps, PredicateProgram};
use std::collections::HashMap;
use std::sync::LazyLock;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

/// `t.Run("name", ...)` in a test function body
pub static T_RUN_STRING_LITERAL: LazyLock<TestPattern> = LazyLock::new(|| {
    TestPattern::embedded(
        "t_run_string_literal",
        include_str!("queries/t_run_string_literal.scm"),
    )
});

/// `for _, tc := range table { t.Run(tc.name, ...) }` in a test function body
pub static T_RUN_STRUCT_LITERAL: LazyLock<TestPattern> = LazyLock::new(|| {
    TestPattern::embedded(
        "t_run_struct_literal",
        include_str!("queries/t_run_struct_literal.scm"),
    )
});

/// Named captures of one accepted match
#[derive(Debug, Clone)]
pub struct CaptureSet<'tree> {
    nodes: HashMap<String, Node<'tree>>,
    source: &'tree [u8],
}

impl<'tree> CaptureSet<'tree> {
    pub fn node(&self, name: &str) -> Option<Node<'tree>> {
        self.nodes.get(name).copied()
    }

    pub fn text(&self, name: &str) -> Option<&'tree str> {
        let node = self.nodes.get(name)?;
        self.source
            .get(node.start_byte()..node.end_byte())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// A compiled query plus one predicate program per pattern it contains
pub struct TestPattern {
    pub name: &'static str,
    query: Query,
    programs: Vec<PredicateProgram>,
}

impl TestPattern {
    pub fn compile(name: &'static str, source: &str) -> Result<Self, PatternError> {
        let query = Query::new(&go_language(), source)?;
        let programs = (0..query.pattern_count())
            .map(|index| PredicateProgram::compile(&predicate_steps(&query, index)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            query,
            programs,
        })
    }

    /// Compile a pattern shipped inside the binary.
    ///
    /// Failure means the embedded queries and the interpreter disagree, which
    /// no input can cause or recover from.
    fn embedded(name: &'static str, source: &str) -> Self {
        Self::compile(name, source)
            .unwrap_or_else(|e| panic!("embedded query `{}` is invalid: {}", name, e))
    }

    /// All matches below `root` whose predicates hold
    pub fn scan<'tree>(&self, root: Node<'tree>, source: &'tree [u8]) -> Vec<CaptureSet<'tree>> {
        let capture_names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root, source);
        let mut accepted = Vec::new();

        while let Some(query_match) = matches.next() {
            let accepts = self
                .programs
                .get(query_match.pattern_index)
                .map_or(true, |program| program.matches(query_match.captures, source));
            if !accepts {
                continue;
            }

            let nodes = query_match
                .captures
                .iter()
                .map(|capture| {
                    (
                        capture_names[capture.index as usize].to_string(),
                        capture.node,
                    )
                })
                .collect();
            accepted.push(CaptureSet { nodes, source });
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::go_parser;

    #[test]
    fn test_embedded_patterns_compile() {
        for source in [
            include_str!("queries/t_run_string_literal.scm"),
            include_str!("queries/t_run_struct_literal.scm"),
        ] {
            if let Err(e) = TestPattern::compile("embedded", source) {
                panic!("embedded query does not compile against the Go grammar: {}", e);
            }
        }
        assert_eq!(T_RUN_STRING_LITERAL.name, "t_run_string_literal");
        assert_eq!(T_RUN_STRUCT_LITERAL.name, "t_run_struct_literal");
    }

    #[test]
    fn test_compile_rejects_unknown_predicate() {
        let result = TestPattern::compile(
            "bad",
            "((identifier) @id (#frobnicate? @id))",
        );
        assert!(matches!(result, Err(PatternError::Predicate(_))));
    }

    #[test]
    fn test_compile_rejects_invalid_query() {
        let result = TestPattern::compile("bad", "(no_such_node) @x");
        assert!(matches!(result, Err(PatternError::Query(_))));
    }

    #[test]
    fn test_scan_string_literal_captures() {
        let source = r#"package test
func TestWeb(t *testing.T) {
	t.Run("works", func(t *testing.T) {})
	helper.Do("ignored")
}
func helperWeb(t *testing.T) {
	t.Run("not a test function", func(t *testing.T) {})
}
"#;
        let tree = go_parser().unwrap().parse(source, None).unwrap();
        let hits = T_RUN_STRING_LITERAL.scan(tree.root_node(), source.as_bytes());

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text("func.name"), Some("TestWeb"));
        assert_eq!(hits[0].text("test.name"), Some("\"works\""));
        assert_eq!(hits[0].text("call.target"), Some("t.Run"));
    }

    #[test]
    fn test_scan_struct_literal_requires_same_loop_variable() {
        let source = r#"package test
func TestWeb(t *testing.T) {
	tests := []struct{ name string }{{name: "a"}}
	for _, tc := range tests {
		t.Run(tc.name, func(t *testing.T) {})
	}
	for _, other := range tests {
		t.Run(tc.name, func(t *testing.T) {})
	}
}
"#;
        let tree = go_parser().unwrap().parse(source, None).unwrap();
        let hits = T_RUN_STRUCT_LITERAL.scan(tree.root_node(), source.as_bytes());

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text("loop.var"), Some("tc"));
        assert_eq!(hits[0].text("field.name"), Some("name"));
        assert_eq!(hits[0].text("table"), Some("tests"));
    }
}
