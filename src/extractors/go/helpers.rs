use crate::extractors::base::{ParamType, SourceUnit};
use tree_sitter::Node;

/// Test functions and suite methods start with this prefix
pub const TEST_NAME_PREFIX: &str = "Test";

/// The test-context handle every root test takes
pub const TEST_HANDLE_TYPE: &str = "testing.T";

/// Callee spelling of the call that runs a suite
pub const SUITE_RUN_CALL: &str = "suite.Run";

/// Identifiers that wrap a suite instance without naming it (`new(T)`)
pub const SKIP_IDENTS: &[&str] = &["new"];

pub fn is_test_name(name: &str) -> bool {
    name.starts_with(TEST_NAME_PREFIX)
}

/// Type name with one pointer level, parentheses and type arguments stripped
///
/// `*Suite` -> `Suite`, `Suite[int]` -> `Suite`, `pkg.Suite` -> `pkg.Suite`.
pub(crate) fn base_type_name(unit: &SourceUnit, node: Node) -> String {
    match node.kind() {
        "pointer_type" | "parenthesized_type" => match node.named_child(0) {
            Some(inner) => base_type_name(unit, inner),
            None => unit.get_compact_text(&node),
        },
        "generic_type" => match node.child_by_field_name("type") {
            Some(inner) => base_type_name(unit, inner),
            None => unit.get_compact_text(&node),
        },
        _ => unit.get_compact_text(&node),
    }
}

/// Build the parameter descriptor for a declared type node
pub(crate) fn param_type(unit: &SourceUnit, type_node: Node) -> ParamType {
    if type_node.kind() == "pointer_type" {
        if let Some(inner) = type_node.named_child(0) {
            return ParamType {
                text: unit.get_compact_text(&inner),
                by_pointer: true,
            };
        }
    }

    ParamType {
        text: unit.get_compact_text(&type_node),
        by_pointer: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_nodes(unit: &SourceUnit) -> Vec<Node<'_>> {
        let root = unit.root();
        unit.find_nodes_by_type(&root, "var_spec")
            .iter()
            .filter_map(|spec| spec.child_by_field_name("type"))
            .collect()
    }

    #[test]
    fn test_base_type_name_strips_pointer_and_type_arguments() {
        let source = "package test\nvar a *Suite\nvar b Suite[int]\nvar c *pkg.Suite\nvar d Suite\n";
        let unit = SourceUnit::parse("a_test.go", source).unwrap();
        let names: Vec<String> = type_nodes(&unit)
            .into_iter()
            .map(|n| base_type_name(&unit, n))
            .collect();
        assert_eq!(names, vec!["Suite", "Suite", "pkg.Suite", "Suite"]);
    }

    #[test]
    fn test_param_type_records_pointer() {
        let source = "package test\nvar a * testing.T\nvar b testing.T\n";
        let unit = SourceUnit::parse("a_test.go", source).unwrap();
        let params: Vec<ParamType> = type_nodes(&unit)
            .into_iter()
            .map(|n| param_type(&unit, n))
            .collect();
        assert_eq!(
            params,
            vec![
                ParamType { text: "testing.T".into(), by_pointer: true },
                ParamType { text: "testing.T".into(), by_pointer: false },
            ]
        );
    }

    #[test]
    fn test_is_test_name() {
        assert!(is_test_name("TestWeb"));
        assert!(is_test_name("Test"));
        assert!(!is_test_name("testWeb"));
        assert!(!is_test_name("BenchmarkWeb"));
    }
}
