//! Shape-based test classification.
//!
//! A function with the `Test` prefix but the wrong arity or receiver shape is
//! `NotATest`. Only shapes the Go test runner and testify suites actually
//! invoke are reported.

use super::helpers::{is_test_name, TEST_HANDLE_TYPE};
use crate::extractors::base::{FunctionDecl, TestKind};

pub fn classify(decl: &FunctionDecl) -> TestKind {
    if is_root_test(decl) {
        TestKind::RootTest
    } else if is_possible_suite_test(decl) {
        TestKind::SuiteMethod
    } else {
        TestKind::NotATest
    }
}

/// Exactly one parameter whose type, one pointer level stripped, is `testing.T`
pub fn is_single_argument_test_handle(decl: &FunctionDecl) -> bool {
    match decl.params.as_slice() {
        [param] => param.text == TEST_HANDLE_TYPE,
        _ => false,
    }
}

pub fn has_receiver_and_no_arguments(decl: &FunctionDecl) -> bool {
    decl.has_receiver() && decl.params.is_empty()
}

pub fn is_root_test(decl: &FunctionDecl) -> bool {
    is_test_name(&decl.name) && !decl.has_receiver() && is_single_argument_test_handle(decl)
}

pub fn is_possible_suite_test(decl: &FunctionDecl) -> bool {
    is_test_name(&decl.name) && has_receiver_and_no_arguments(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::SourceUnit;

    fn classify_first(code: &str) -> TestKind {
        let unit = SourceUnit::parse("classify_test.go", code).unwrap();
        let decls = unit.top_level_functions();
        classify(decls.first().expect("functions not found"))
    }

    fn single_argument(code: &str) -> bool {
        let unit = SourceUnit::parse("classify_test.go", code).unwrap();
        is_single_argument_test_handle(&unit.top_level_functions()[0])
    }

    fn receiver_no_arguments(code: &str) -> bool {
        let unit = SourceUnit::parse("classify_test.go", code).unwrap();
        has_receiver_and_no_arguments(&unit.top_level_functions()[0])
    }

    #[test]
    fn test_is_single_argument_test_handle() {
        assert!(single_argument("package test\nfunc TestSimple(t *testing.T) {}"));
        assert!(single_argument("package test\nfunc NoTestSimple(t *testing.T) {}"));
        assert!(single_argument("package test\nfunc NoTestSimple(randomName *testing.T) {}"));
        assert!(single_argument("package test\nfunc TestByValue(t testing.T) {}"));
        assert!(!single_argument("package test\nfunc TestSimple(t *testing.T, more bool) {}"));
        assert!(!single_argument("package test\nfunc TestSimple(t *testing.B, more bool) {}"));
        assert!(!single_argument("package test\nfunc TestSimple(t *testing.B) {}"));
        assert!(!single_argument("package test\nfunc TestSimple(t **testing.T) {}"));
    }

    #[test]
    fn test_has_receiver_and_no_arguments() {
        assert!(!receiver_no_arguments("package test\nfunc TestSimple1(t *testing.T) {}"));
        assert!(!receiver_no_arguments("package test\nfunc (p *int) TestSimple2(t *testing.T) {}"));
        assert!(!receiver_no_arguments("package test\nfunc (p int) TestSimple3(t *testing.T) {}"));
        assert!(receiver_no_arguments("package test\nfunc (p int) TestSimple4() {}"));
        assert!(receiver_no_arguments("package test\nfunc (p *int) TestSimple5() {}"));
        assert!(receiver_no_arguments("package test\nfunc (p * int) TestSimple6() {}"));
    }

    #[test]
    fn test_classify_root_test() {
        assert_eq!(classify_first("package test\nfunc TestX(t *testing.T) {}"), TestKind::RootTest);
        assert_eq!(classify_first("package test\nfunc TestX(t testing.T) {}"), TestKind::RootTest);
        assert_eq!(classify_first("package test\nfunc TestX(t * testing.T) {}"), TestKind::RootTest);
    }

    #[test]
    fn test_classify_wrong_shapes_are_not_tests() {
        for code in [
            "package test\nfunc TestX(t *testing.T, more bool) {}",
            "package test\nfunc TestX(t *something.T) {}",
            "package test\nfunc TestX() {}",
            "package test\nfunc HelperX(t *testing.T) {}",
            "package test\nfunc (s someType) TestInvalidArgs(t *testing.T) {}",
            "package test\nfunc (s someType) IncorrectName() {}",
        ] {
            assert_eq!(classify_first(code), TestKind::NotATest, "{code}");
        }
    }

    #[test]
    fn test_classify_suite_method() {
        assert_eq!(classify_first("package test\nfunc (s S) TestA() {}"), TestKind::SuiteMethod);
        assert_eq!(classify_first("package test\nfunc (s *S) TestB() {}"), TestKind::SuiteMethod);
    }
}
