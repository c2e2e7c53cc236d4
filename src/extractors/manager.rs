//! Extraction driver - public API for per-file test-name extraction
//!
//! Runs the declaration-based (AST) strategy and the sub-test pattern
//! strategy side by side and unions their output. A strategy that fails on
//! a file contributes nothing; the other strategy's names are still reported.

use crate::extractors::go::{ast_test_names, subtests::pattern_test_names};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Union of both strategies over one in-memory source file
///
/// `path_label` is only used in log messages.
pub fn extract_source_test_names(path_label: &str, content: &str) -> BTreeSet<String> {
    let (ast, patterns) = rayon::join(
        || ast_test_names(path_label, content),
        || pattern_test_names(path_label, content),
    );

    let mut names = BTreeSet::new();
    match ast {
        Ok(found) => names.extend(found),
        Err(e) => debug!("AST strategy skipped: {}", e),
    }
    match patterns {
        Ok(found) => names.extend(found),
        Err(e) => debug!("Pattern strategy skipped: {}", e),
    }
    names
}

/// Read `path` and extract its test names
///
/// Unreadable or non-UTF-8 files yield an empty set.
pub fn extract_file_test_names(path: &Path) -> BTreeSet<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return BTreeSet::new();
        }
    };

    let label = path.to_string_lossy();
    match String::from_utf8(bytes) {
        Ok(content) => extract_source_test_names(&label, &content),
        Err(_) => {
            warn!("Skipping {}: not valid UTF-8", label);
            BTreeSet::new()
        }
    }
}
