//! Test-name extractors
//!
//! Everything here works on a single Go source file; directory traversal
//! lives in [`crate::walker`].
//!
//! # Architecture
//!
//! - `base` - parsed-file handle, declarations and tree navigation helpers
//! - `go` - the AST strategy (root tests, suites) and the sub-test pattern strategy
//! - `manager` - runs both strategies on a file and unions their results

pub mod base;
pub mod go;
pub mod manager;

// Re-export the public API
pub use base::{FunctionDecl, Resolution, SourceUnit, TestKind};
pub use go::{ast_test_names, subtests::pattern_test_names};
pub use manager::{extract_file_test_names, extract_source_test_names};
