// golisttests - static enumeration of Go test names
//
// Parses `_test.go` files with tree-sitter and lists every name `go test -run`
// can address: root tests, testify suite methods and `t.Run` sub-tests.
// The same engine is exposed as a library, a CLI and (feature `python`) a
// PyO3 extension module.

pub mod error;
pub mod extractors;
pub mod language;
pub mod query;
pub mod walker;

// PyO3 bindings layer
#[cfg(feature = "python")]
pub mod bindings;

pub use error::{ExtractError, PatternError, PredicateError, WalkError};
pub use extractors::{
    ast_test_names, extract_file_test_names, extract_source_test_names, pattern_test_names,
};
pub use walker::{list_test_names, Budget, Limited, ScanOptions, Unlimited, WalkReport};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// golisttests Python module
///
/// Provides Go test-name extraction for single sources, batches and directory trees.
#[cfg(feature = "python")]
#[pymodule]
fn golisttests(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(bindings::extract_file_test_names, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_source_test_names, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_sources_batch, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::list_test_names, m)?)?;

    Ok(())
}
