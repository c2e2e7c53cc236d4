//! Language Support - tree-sitter configuration for Go test files
//!
//! Every parser and query in the crate gets its grammar from here, so the
//! grammar version is pinned in exactly one place.

use anyhow::Result;
use std::path::Path;
use tree_sitter::Parser;

/// File name suffix the Go toolchain uses for test files
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// Get the tree-sitter Go grammar
pub fn go_language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Create a parser already configured for Go
pub fn go_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| anyhow::anyhow!("Failed to set parser language for go: {}", e))?;
    Ok(parser)
}

/// Check whether a path names a Go test file (`*_test.go`)
pub fn is_test_filename(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TEST_FILE_SUFFIX))
}
