// PyO3 Bindings Module
//
// Python entry points over the extraction driver and the walker.
// Only compiled with the `python` feature.

mod api;

// Re-export for lib.rs
pub use api::{extract_file_test_names, extract_source_test_names, extract_sources_batch, list_test_names};
