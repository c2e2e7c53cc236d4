// Base Types for test-name extraction
//
// Declarations read from a parsed Go file, the classification of a function
// as a test, and the outcome of resolving a suite instance to its type.

use tree_sitter::Node;

/// Receiver of a method declaration: `(s *Suite)` or `(s Suite)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Receiver type with pointer and type arguments stripped (`*Suite[T]` -> `Suite`)
    pub type_name: String,
    /// Whether the receiver is declared by pointer
    pub by_pointer: bool,
}

/// One declared parameter, as spelled at the declaration site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    /// Type text after stripping one pointer level, whitespace removed (`* testing.T` -> `testing.T`)
    pub text: String,
    /// Whether the declared type was a pointer
    pub by_pointer: bool,
}

/// A top-level function or method declaration
///
/// Borrowed from the `SourceUnit` that parsed it and immutable afterwards.
#[derive(Debug, Clone)]
pub struct FunctionDecl<'tree> {
    pub name: String,
    pub receiver: Option<Receiver>,
    /// One entry per declared parameter name (`a, b *testing.T` is two parameters)
    pub params: Vec<ParamType>,
    /// The `function_declaration` / `method_declaration` node
    pub node: Node<'tree>,
}

impl FunctionDecl<'_> {
    pub fn has_receiver(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Shape-based classification of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    NotATest,
    /// `func TestX(t *testing.T)`; may additionally run suites
    RootTest,
    /// `func (s *S) TestX()`; a sub-test of every root test that runs `S`
    SuiteMethod,
}

/// Outcome of resolving the identifier behind a suite instance expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A declared or inferred type name, pointer indirection stripped
    Bound(String),
    /// No binding was found; the identifier's own text stands in for the type
    Fallback(String),
}

impl Resolution {
    /// The suite type name to group by, whichever way it was obtained
    pub fn type_name(&self) -> &str {
        match self {
            Resolution::Bound(name) | Resolution::Fallback(name) => name,
        }
    }
}
