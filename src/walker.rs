//! Directory walker with an execution budget.
//!
//! Visits every regular file under a root in a deterministic order, charges
//! each one against a [`Budget`], and extracts test names from the files the
//! Go toolchain treats as tests. Budget and walk failures stop the walk but
//! never discard the names collected so far.

use crate::error::WalkError;
use crate::extractors::manager::extract_file_test_names;
use crate::language::is_test_filename;
use ignore::WalkBuilder;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default file quota of a [`Limited`] budget
pub const DEFAULT_MAX_FILES: usize = 10_000;

/// Default wall-clock allowance of a [`Limited`] budget
pub const DEFAULT_MAX_EXECUTION: Duration = Duration::from_secs(1);

/// Charged once per visited regular file
pub trait Budget {
    fn tick(&mut self) -> Result<(), WalkError>;
}

/// Never runs out
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

impl Budget for Unlimited {
    fn tick(&mut self) -> Result<(), WalkError> {
        Ok(())
    }
}

/// File quota plus a deadline measured from construction
#[derive(Debug, Clone)]
pub struct Limited {
    max_files: usize,
    remaining_files: usize,
    max_execution: Duration,
    deadline: Instant,
}

impl Limited {
    pub fn new(max_files: usize, max_execution: Duration) -> Self {
        Self {
            max_files,
            remaining_files: max_files,
            max_execution,
            deadline: Instant::now() + max_execution,
        }
    }
}

impl Default for Limited {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILES, DEFAULT_MAX_EXECUTION)
    }
}

impl Budget for Limited {
    fn tick(&mut self) -> Result<(), WalkError> {
        if self.remaining_files == 0 {
            return Err(WalkError::FileLimitExceeded {
                limit: self.max_files,
            });
        }
        self.remaining_files -= 1;

        if Instant::now() >= self.deadline {
            return Err(WalkError::DeadlineExceeded {
                limit: self.max_execution,
            });
        }
        Ok(())
    }
}

/// Walk configuration
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Apply `.gitignore`, `.ignore` and hidden-file filtering
    pub respect_gitignore: bool,
}

/// Names collected by a walk, and the failure that stopped it, if any
#[derive(Debug, Default, Serialize)]
pub struct WalkReport {
    pub names: Vec<String>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<WalkError>,
}

fn serialize_error<S: Serializer>(error: &Option<WalkError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Sorted, de-duplicated test names of every `_test.go` file under `root`
pub fn list_test_names(root: &Path, options: &ScanOptions, budget: &mut dyn Budget) -> WalkReport {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(options.respect_gitignore)
        .hidden(options.respect_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut names = BTreeSet::new();
    let mut error = None;
    let mut visited = 0usize;

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error = Some(WalkError::Walk(e));
                break;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if let Err(e) = budget.tick() {
            error = Some(e);
            break;
        }
        visited += 1;

        let path = entry.path();
        if !is_test_filename(path) {
            continue;
        }
        let found = extract_file_test_names(path);
        debug!("{}: {} test names", path.display(), found.len());
        names.extend(found);
    }

    debug!(
        "Visited {} files under {}, {} test names{}",
        visited,
        root.display(),
        names.len(),
        if error.is_some() { " (incomplete)" } else { "" }
    );

    WalkReport {
        names: names.into_iter().collect(),
        error,
    }
}
