// Base types and the parsed-file handle shared by both extraction strategies
//
// - types.rs: declarations, test classification, resolution outcomes
// - source.rs: SourceUnit (content + tree-sitter tree)
// - tree_methods.rs: tree navigation helpers on SourceUnit

pub mod source;
pub mod tree_methods;
pub mod types;

pub use source::SourceUnit;
pub use types::{FunctionDecl, ParamType, Receiver, Resolution, TestKind};
