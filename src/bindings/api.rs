// API Functions - PyO3-exposed functions for Python
//
// Names are returned as sorted lists of str. Walk failures (budget or
// filesystem) raise RuntimeError; per-file failures never do.

use crate::extractors::manager;
use crate::walker::{self, Budget, Limited, ScanOptions, Unlimited, DEFAULT_MAX_EXECUTION, DEFAULT_MAX_FILES};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extract test names from one Go test file
///
/// Args:
///     path (str): Path of a `_test.go` file
///
/// Returns:
///     list[str]: Sorted test names; empty if the file cannot be read
#[pyfunction]
#[pyo3(signature = (path))]
pub fn extract_file_test_names(py: Python<'_>, path: PathBuf) -> Vec<String> {
    py.detach(move || manager::extract_file_test_names(&path).into_iter().collect())
}

/// Extract test names from Go source held in memory
///
/// Args:
///     content (str): Go source code
///     file_path (str): Label used in log messages
///
/// Returns:
///     list[str]: Sorted test names
#[pyfunction]
#[pyo3(signature = (content, file_path = "<memory>"))]
pub fn extract_source_test_names(py: Python<'_>, content: &str, file_path: &str) -> Vec<String> {
    py.detach(|| {
        manager::extract_source_test_names(file_path, content)
            .into_iter()
            .collect()
    })
}

/// Extract test names from many in-memory sources in parallel
///
/// Releases the GIL and spreads the files over Rayon's thread pool.
///
/// Args:
///     files (list[tuple[str, str]]): (content, file_path) pairs
///
/// Returns:
///     list[list[str]]: Names per input, in input order
#[pyfunction]
#[pyo3(signature = (files))]
pub fn extract_sources_batch(py: Python<'_>, files: Vec<(String, String)>) -> Vec<Vec<String>> {
    use rayon::prelude::*;

    py.detach(move || {
        files
            .par_iter()
            .map(|(content, file_path)| {
                manager::extract_source_test_names(file_path, content)
                    .into_iter()
                    .collect()
            })
            .collect()
    })
}

/// List test names of every `_test.go` file under a directory
///
/// Passing either limit enables the execution budget; the other one then
/// takes its default (10000 files, 1000 ms).
///
/// Args:
///     root (str): Directory to walk
///     max_files (int | None): File quota
///     max_execution_ms (int | None): Wall-clock allowance in milliseconds
///     respect_gitignore (bool): Skip ignored and hidden files
///
/// Returns:
///     list[str]: Sorted test names
///
/// Raises:
///     RuntimeError: If the budget ran out or the walk failed
#[pyfunction]
#[pyo3(signature = (root, max_files = None, max_execution_ms = None, respect_gitignore = false))]
pub fn list_test_names(
    py: Python<'_>,
    root: PathBuf,
    max_files: Option<usize>,
    max_execution_ms: Option<u64>,
    respect_gitignore: bool,
) -> PyResult<Vec<String>> {
    let mut budget: Box<dyn Budget + Send> = match (max_files, max_execution_ms) {
        (None, None) => Box::new(Unlimited),
        (files, millis) => Box::new(Limited::new(
            files.unwrap_or(DEFAULT_MAX_FILES),
            millis.map(Duration::from_millis).unwrap_or(DEFAULT_MAX_EXECUTION),
        )),
    };
    let options = ScanOptions { respect_gitignore };

    let report = py.detach(move || walker::list_test_names(Path::new(&root), &options, budget.as_mut()));

    match report.error {
        Some(error) => Err(PyRuntimeError::new_err(format!(
            "{} ({} names found before stopping)",
            error,
            report.names.len()
        ))),
        None => Ok(report.names),
    }
}
