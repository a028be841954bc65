//! Purpose: Error model shared by collection, loading, and extraction.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`, `io_error`.
//! Role: Single typed error carried into `Failure` records and CLI exit codes.
//! Invariants: Exit code mapping is stable once published.
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Permission,
    Io,
    Parse,
    Invalid,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Internal => "Internal",
            ErrorKind::Usage => "Usage",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Permission => "Permission",
            ErrorKind::Io => "Io",
            ErrorKind::Parse => "Parse",
            ErrorKind::Invalid => "Invalid",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    path: Option<PathBuf>,
    widget: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            path: None,
            widget: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn widget(&self) -> Option<&str> {
        self.widget.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(widget) = &self.widget {
            write!(f, " (widget: {widget})")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

/// Wrap an I/O error, keeping not-found and permission failures distinguishable.
pub fn io_error(err: io::Error, message: &str, path: &Path) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message(message)
        .with_path(path)
        .with_source(err)
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Permission => 4,
        ErrorKind::Io => 5,
        ErrorKind::Parse => 6,
        ErrorKind::Invalid => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, io_error, to_exit_code};
    use std::io;
    use std::path::Path;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Permission, 4),
            (ErrorKind::Io, 5),
            (ErrorKind::Parse, 6),
            (ErrorKind::Invalid, 7),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn io_error_maps_not_found_and_permission() {
        let path = Path::new("missing.json");
        let not_found = io_error(io::Error::from(io::ErrorKind::NotFound), "read", path);
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.path(), Some(path));

        let denied = io_error(io::Error::from(io::ErrorKind::PermissionDenied), "read", path);
        assert_eq!(denied.kind(), ErrorKind::Permission);

        let other = io_error(io::Error::other("disk full"), "write", path);
        assert_eq!(other.kind(), ErrorKind::Io);
    }

    #[test]
    fn display_includes_context() {
        let err = Error::new(ErrorKind::Invalid)
            .with_message("widget name is empty")
            .with_widget("")
            .with_path("input/a.json");
        let text = err.to_string();
        assert!(text.starts_with("Invalid: widget name is empty"));
        assert!(text.contains("(path: input/a.json)"));
    }
}
