pub mod classify;
mod functions;
pub mod helpers;
pub mod identifiers;
pub mod subtests;
pub mod suite;

use crate::error::ExtractError;
use crate::extractors::base::{SourceUnit, TestKind};
use classify::classify;
use identifiers::TypeResolver;
use suite::{find_suite_run_types, Tracker};
use tracing::debug;

/// Declaration-based extractor for Go test names:
/// - Root tests: `func TestX(t *testing.T)`
/// - Suite runners: root tests calling `suite.Run(t, <instance>)`
/// - Suite methods: `func (s *S) TestY()`, reported as `TestX/TestY` for every runner of `S`
pub struct GoTestExtractor<'a> {
    unit: &'a SourceUnit,
    resolver: TypeResolver<'a>,
    tracker: Tracker,
}

impl<'a> GoTestExtractor<'a> {
    pub fn new(unit: &'a SourceUnit) -> Self {
        Self {
            unit,
            resolver: TypeResolver::new(unit),
            tracker: Tracker::new(),
        }
    }

    /// Sorted, de-duplicated qualified test names of the unit
    ///
    /// The scan runs twice: a suite runner may be declared before or after the
    /// methods it activates, and the second pass sees every binding the first
    /// pass established.
    pub fn extract_test_names(mut self) -> Vec<String> {
        self.scan();
        self.scan();
        self.tracker.into_seen_tests()
    }

    fn scan(&mut self) {
        for decl in self.unit.top_level_functions() {
            match classify(&decl) {
                TestKind::RootTest => {
                    self.tracker.add_test(decl.name.clone());
                    for ident in find_suite_run_types(self.unit, &decl) {
                        let resolution = self.resolver.resolve(ident);
                        if !resolution.type_name().is_empty() {
                            self.tracker
                                .suite_ran_by_test(resolution.type_name(), &decl.name);
                        }
                    }
                }
                TestKind::SuiteMethod => {
                    let Some(receiver) = &decl.receiver else {
                        continue;
                    };
                    for runner in self.tracker.who_ran_suite_type(&receiver.type_name) {
                        self.tracker.add_test(format!("{}/{}", runner, decl.name));
                    }
                }
                TestKind::NotATest => {}
            }
        }
    }
}

/// AST strategy: names from declarations, suite runners and suite methods
///
/// Files with syntax errors are rejected, like a compiler front end would.
pub fn ast_test_names(file_path: &str, content: &str) -> Result<Vec<String>, ExtractError> {
    let unit = SourceUnit::parse(file_path, content)?;
    unit.ensure_well_formed()?;

    let names = GoTestExtractor::new(&unit).extract_test_names();
    debug!("AST strategy found {} names in {}", names.len(), file_path);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(code: &str) -> Vec<String> {
        ast_test_names("names_test.go", code).unwrap()
    }

    #[test]
    fn test_simple_tests() {
        assert!(names("package test\nfunc (p int) TestSimple1() {}\n").is_empty());
        assert!(names("package test\nfunc TestSimple2() {}\n").is_empty());
        assert!(names("package test\nfunc TestSimple3(t *something.T) {}\n").is_empty());
        assert_eq!(names("package test\nfunc TestSimple4(t *testing.T) {}\n"), vec!["TestSimple4"]);
        assert_eq!(names("package test\nfunc TestSimple5(t * testing.T) {}\n"), vec!["TestSimple5"]);
    }

    #[test]
    fn test_suite_runner_without_methods() {
        assert_eq!(
            names(
                r#"package test
func TestSimple1(t *testing.T) {}
func TestSampleSuite(t *testing.T) {
	suite.Run(t, &someType{})
}
"#
            ),
            vec!["TestSampleSuite", "TestSimple1"]
        );
    }

    const SUITE_FILE: &str = r#"package test
func TestSimple1(t *testing.T) {}
func (s someType) TestInvalidArgs1(t *testing.T) {}
func (s *someType) TestInvalidArgs2(t *testing.T) {}
func (s someType) IncorrectName1() {}
func (s *someType) IncorrectName2() {}
func (s someType) TestValidBefore1() {}
func (s *someType) TestValidBefore2() {}
func TestSampleSuite(t *testing.T) {
	suite.Run(t, &someType{})
}
func (s someType) TestValidAfter1() {}
func (s *someType) TestValidAfter2() {}
func (s unknownType) TestNeverRun1() {}
func (s *unknownType) TestNeverRun2() {}
"#;

    #[test]
    fn test_suite_methods_before_and_after_runner() {
        assert_eq!(
            names(SUITE_FILE),
            vec![
                "TestSampleSuite",
                "TestSampleSuite/TestValidAfter1",
                "TestSampleSuite/TestValidAfter2",
                "TestSampleSuite/TestValidBefore1",
                "TestSampleSuite/TestValidBefore2",
                "TestSimple1",
            ]
        );
    }

    #[test]
    fn test_same_suite_type_run_by_two_roots() {
        let code = format!(
            "{}func TestSameTypeDifferentSuite(t *testing.T) {{\n\tsuite.Run(t, &someType{{}})\n}}\n",
            SUITE_FILE
        );
        assert_eq!(
            names(&code),
            vec![
                "TestSameTypeDifferentSuite",
                "TestSameTypeDifferentSuite/TestValidAfter1",
                "TestSameTypeDifferentSuite/TestValidAfter2",
                "TestSameTypeDifferentSuite/TestValidBefore1",
                "TestSameTypeDifferentSuite/TestValidBefore2",
                "TestSampleSuite",
                "TestSampleSuite/TestValidAfter1",
                "TestSampleSuite/TestValidAfter2",
                "TestSampleSuite/TestValidBefore1",
                "TestSampleSuite/TestValidBefore2",
                "TestSimple1",
            ]
        );
    }

    #[test]
    fn test_declaration_order_does_not_matter() {
        let runner_first = r#"package test
func TestSuite(t *testing.T) {
	suite.Run(t, &S{})
}
func (s S) TestA() {}
func (s *S) TestB() {}
"#;
        let runner_last = r#"package test
func (s S) TestA() {}
func (s *S) TestB() {}
func TestSuite(t *testing.T) {
	suite.Run(t, &S{})
}
"#;
        assert_eq!(names(runner_first), names(runner_last));
        assert_eq!(
            names(runner_first),
            vec!["TestSuite", "TestSuite/TestA", "TestSuite/TestB"]
        );
    }

    #[test]
    fn test_resolve_env_type_name() {
        for body in [
            "suite.Run(t, &Env{})",
            "env := &Env{}\n\tsuite.Run(t, env)",
            "env := Env{}\n\tsuite.Run(t, &env)",
            "env := Env{}\n\tsuite.Run(t, env)",
            "suite.Run(t, new(Env))",
        ] {
            let code = format!(
                "package test\ntype Env struct {{}}\nfunc (e *Env) TestValid() {{}}\nfunc TestWeb(t *testing.T) {{\n\t{}\n}}\n",
                body
            );
            assert_eq!(names(&code), vec!["TestWeb", "TestWeb/TestValid"], "{body}");
        }
    }

    #[test]
    fn test_root_tests_and_suite_methods() {
        let code = r#"package test
func TestSimple1(t *testing.T) {}
func TestSuite(t *testing.T) {
	suite.Run(t, &S{})
}
func (s S) TestA() {}
func (s *S) TestB() {}
"#;
        assert_eq!(
            names(code),
            vec!["TestSimple1", "TestSuite", "TestSuite/TestA", "TestSuite/TestB"]
        );
    }

    #[test]
    fn test_runner_variable_shadowed_only_in_nested_scopes() {
        for body in [
            "env := &Env{}\n\tcheck := func(env *Other) {}\n\t_ = check\n\tsuite.Run(t, env)",
            "env := &Env{}\n\tif true {\n\t\tenv := &Other{}\n\t\t_ = env\n\t}\n\tsuite.Run(t, env)",
        ] {
            let code = format!(
                "package test\ntype Env struct {{}}\nfunc (e *Env) TestValid() {{}}\nfunc TestWeb(t *testing.T) {{\n\t{}\n}}\n",
                body
            );
            assert_eq!(names(&code), vec!["TestWeb", "TestWeb/TestValid"], "{body}");
        }
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let err = ast_test_names("broken_test.go", "package test\nfunc TestX(t *testing.T {\n").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(names(SUITE_FILE), names(SUITE_FILE));
    }
}
