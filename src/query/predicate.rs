//! Predicate interpreter for query patterns.
//!
//! Each pattern carries a flat instruction sequence: a predicate name, its
//! operands, then an end marker. The sequence is compiled once per pattern
//! and evaluated against every match the pattern produces.
//!
//! | name          | operands             | holds when                         |
//! |---------------|----------------------|------------------------------------|
//! | `eq-text?`    | capture, capture     | both captures have identical text  |
//! | `match-text?` | capture, string      | the capture's text matches a regex |
//!
//! The names are custom so tree-sitter leaves them as general predicates
//! instead of evaluating them itself.

use crate::error::PredicateError;
use regex::Regex;
use tree_sitter::{Query, QueryCapture, QueryPredicateArg};

pub const EQ_TEXT: &str = "eq-text?";
pub const MATCH_TEXT: &str = "match-text?";

/// One step of a flattened predicate program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateStep {
    String(String),
    Capture(u32),
    Done,
}

/// Flatten the general predicates tree-sitter parsed for `pattern_index`
pub fn predicate_steps(query: &Query, pattern_index: usize) -> Vec<PredicateStep> {
    let mut steps = Vec::new();
    for predicate in query.general_predicates(pattern_index) {
        steps.push(PredicateStep::String(predicate.operator.to_string()));
        for arg in predicate.args.iter() {
            steps.push(match arg {
                QueryPredicateArg::Capture(index) => PredicateStep::Capture(*index),
                QueryPredicateArg::String(value) => PredicateStep::String(value.to_string()),
            });
        }
        steps.push(PredicateStep::Done);
    }
    steps
}

#[derive(Debug, Clone)]
enum Instruction {
    TextEq { left: u32, right: u32 },
    TextMatch { capture: u32, pattern: Regex },
}

/// Compiled predicates of one pattern; an empty program accepts every match
#[derive(Debug, Clone, Default)]
pub struct PredicateProgram {
    instructions: Vec<Instruction>,
}

impl PredicateProgram {
    pub fn compile(steps: &[PredicateStep]) -> Result<Self, PredicateError> {
        let mut instructions = Vec::new();
        let mut rest = steps;

        while let Some((first, tail)) = rest.split_first() {
            let name = match first {
                PredicateStep::String(name) => name.as_str(),
                other => {
                    return Err(PredicateError::UnknownPredicate(format!("{:?}", other)));
                }
            };

            let (instruction, remaining) = match name {
                EQ_TEXT => match tail {
                    [PredicateStep::Capture(left), PredicateStep::Capture(right), PredicateStep::Done, remaining @ ..] => (
                        Instruction::TextEq {
                            left: *left,
                            right: *right,
                        },
                        remaining,
                    ),
                    _ => {
                        return Err(PredicateError::BadOperands {
                            name: name.to_string(),
                            expected: "two captures and an end marker",
                        })
                    }
                },
                MATCH_TEXT => match tail {
                    [PredicateStep::Capture(capture), PredicateStep::String(pattern), PredicateStep::Done, remaining @ ..] => {
                        let pattern = Regex::new(pattern).map_err(|source| PredicateError::BadRegex {
                            name: name.to_string(),
                            source,
                        })?;
                        (
                            Instruction::TextMatch {
                                capture: *capture,
                                pattern,
                            },
                            remaining,
                        )
                    }
                    _ => {
                        return Err(PredicateError::BadOperands {
                            name: name.to_string(),
                            expected: "a capture, a pattern string and an end marker",
                        })
                    }
                },
                unknown => return Err(PredicateError::UnknownPredicate(unknown.to_string())),
            };

            instructions.push(instruction);
            rest = remaining;
        }

        Ok(Self { instructions })
    }

    /// Evaluate every instruction in order; the first failing one rejects the match
    ///
    /// A capture the match did not bind fails the instruction that references it.
    pub fn matches(&self, captures: &[QueryCapture], source: &[u8]) -> bool {
        let text = |index: u32| capture_text(captures, index, source);

        self.instructions.iter().all(|instruction| match instruction {
            Instruction::TextEq { left, right } => match (text(*left), text(*right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            Instruction::TextMatch { capture, pattern } => text(*capture)
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .is_some_and(|value| pattern.is_match(value)),
        })
    }
}

fn capture_text<'s>(captures: &[QueryCapture], index: u32, source: &'s [u8]) -> Option<&'s [u8]> {
    captures
        .iter()
        .find(|c| c.index == index)
        .and_then(|c| source.get(c.node.start_byte()..c.node.end_byte()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{go_language, go_parser};
    use tree_sitter::{QueryCursor, StreamingIterator};

    fn s(value: &str) -> PredicateStep {
        PredicateStep::String(value.to_string())
    }

    #[test]
    fn test_compile_known_predicates() {
        PredicateProgram::compile(&[
            s(EQ_TEXT),
            PredicateStep::Capture(0),
            PredicateStep::Capture(1),
            PredicateStep::Done,
            s(MATCH_TEXT),
            PredicateStep::Capture(2),
            s("^t\\.Run$"),
            PredicateStep::Done,
        ])
        .unwrap();
        assert!(PredicateProgram::compile(&[]).is_ok());
    }

    #[test]
    fn test_unknown_predicate_is_rejected() {
        let err = PredicateProgram::compile(&[s("frobnicate?"), PredicateStep::Capture(0), PredicateStep::Done])
            .unwrap_err();
        assert!(matches!(err, PredicateError::UnknownPredicate(name) if name == "frobnicate?"));
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let err = PredicateProgram::compile(&[s(EQ_TEXT), PredicateStep::Capture(0), PredicateStep::Done])
            .unwrap_err();
        assert!(matches!(err, PredicateError::BadOperands { .. }));

        let err = PredicateProgram::compile(&[
            s(MATCH_TEXT),
            PredicateStep::Capture(0),
            PredicateStep::Capture(1),
            PredicateStep::Done,
        ])
        .unwrap_err();
        assert!(matches!(err, PredicateError::BadOperands { .. }));

        // Missing end marker
        let err = PredicateProgram::compile(&[s(EQ_TEXT), PredicateStep::Capture(0), PredicateStep::Capture(1)])
            .unwrap_err();
        assert!(matches!(err, PredicateError::BadOperands { .. }));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = PredicateProgram::compile(&[
            s(MATCH_TEXT),
            PredicateStep::Capture(0),
            s("(unclosed"),
            PredicateStep::Done,
        ])
        .unwrap_err();
        assert!(matches!(err, PredicateError::BadRegex { .. }));
    }

    #[test]
    fn test_steps_from_query_and_evaluation() {
        let source = "package test\nfunc A() { a.Run(a) }\nfunc B() { a.Run(b) }\n";
        let language = go_language();
        let query = Query::new(
            &language,
            r#"(call_expression
                 function: (selector_expression operand: (identifier) @operand)
                 arguments: (argument_list (identifier) @arg)
                 (#eq-text? @operand @arg))"#,
        )
        .unwrap();

        let steps = predicate_steps(&query, 0);
        assert_eq!(
            steps,
            vec![s(EQ_TEXT), PredicateStep::Capture(0), PredicateStep::Capture(1), PredicateStep::Done]
        );
        let program = PredicateProgram::compile(&steps).unwrap();

        let tree = go_parser().unwrap().parse(source, None).unwrap();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
        let mut accepted = 0;
        let mut total = 0;
        while let Some(m) = matches.next() {
            total += 1;
            if program.matches(m.captures, source.as_bytes()) {
                accepted += 1;
            }
        }
        assert_eq!(total, 2);
        assert_eq!(accepted, 1);
    }
}
