//! Purpose: Gather input paths from a directory listing and an explicit file list.
//! Exports: `CollectRequest`, `collect`.
//! Invariants: Directory listing is non-recursive and keeps regular files only.
//! Invariants: Result is deduplicated and sorted so runs are reproducible.
//! Invariants: Listing failures are recorded in the summary and yield no paths.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::error::io_error;
use super::report::{FailureStage, Summary};

#[derive(Clone, Debug, Default)]
pub struct CollectRequest {
    pub directory: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

pub fn collect(request: &CollectRequest, summary: &mut Summary) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();
    if let Some(directory) = &request.directory {
        paths.extend(list_directory(directory, summary));
    }
    paths.extend(request.files.iter().cloned());
    paths.into_iter().collect()
}

fn list_directory(directory: &Path, summary: &mut Summary) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            summary.record(
                FailureStage::ListDirectory,
                &io_error(err, "failed to list input directory", directory),
            );
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(err) => summary.record(
                FailureStage::ListDirectory,
                &io_error(err, "failed to read directory entry", directory),
            ),
        }
    }
    files
}
