//! Purpose: Typed outcome of an unpack run.
//! Exports: `Summary`, `Failure`, `FailureStage`.
//! Role: Replaces console-only error reporting; callers aggregate counts and failures.
//! Invariants: Failures are recorded in occurrence order and never abort the run.
//! Invariants: Counters only grow; a run never un-counts work already done.
use std::path::PathBuf;

use super::error::{Error, ErrorKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FailureStage {
    ListDirectory,
    ReadInput,
    ParseInput,
    InvalidWidget,
    InvalidBundle,
    InvalidName,
    CreateDirectory,
    WriteFile,
    DefaultConfig,
    DecodeImage,
}

impl FailureStage {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureStage::ListDirectory => "list-directory",
            FailureStage::ReadInput => "read-input",
            FailureStage::ParseInput => "parse-input",
            FailureStage::InvalidWidget => "invalid-widget",
            FailureStage::InvalidBundle => "invalid-bundle",
            FailureStage::InvalidName => "invalid-name",
            FailureStage::CreateDirectory => "create-directory",
            FailureStage::WriteFile => "write-file",
            FailureStage::DefaultConfig => "default-config",
            FailureStage::DecodeImage => "decode-image",
        }
    }

    /// Stages that drop a whole input file rather than part of a widget.
    pub fn skips_input(self) -> bool {
        matches!(self, FailureStage::ReadInput | FailureStage::ParseInput)
    }
}

#[derive(Clone, Debug)]
pub struct Failure {
    pub stage: FailureStage,
    pub kind: ErrorKind,
    pub path: Option<PathBuf>,
    pub widget: Option<String>,
    pub message: String,
}

impl Failure {
    pub fn from_error(stage: FailureStage, err: &Error) -> Self {
        Self {
            stage,
            kind: err.kind(),
            path: err.path().map(PathBuf::from),
            widget: err.widget().map(str::to_string),
            message: err.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub files_total: u64,
    pub widgets: u64,
    pub bundles: u64,
    pub files_written: u64,
    pub actions: u64,
    pub images: u64,
    pub failures: Vec<Failure>,
}

impl Summary {
    pub fn record(&mut self, stage: FailureStage, err: &Error) {
        tracing::warn!(stage = stage.as_str(), "{err}");
        self.failures.push(Failure::from_error(stage, err));
    }

    pub fn skipped_files(&self) -> u64 {
        self.failures
            .iter()
            .filter(|failure| failure.stage.skips_input())
            .count() as u64
    }

    pub fn failed_writes(&self) -> u64 {
        self.failures
            .iter()
            .filter(|failure| {
                matches!(
                    failure.stage,
                    FailureStage::WriteFile | FailureStage::CreateDirectory
                )
            })
            .count() as u64
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Kind of the first recorded failure; drives the CLI exit code.
    pub fn first_failure_kind(&self) -> Option<ErrorKind> {
        self.failures.first().map(|failure| failure.kind)
    }
}
