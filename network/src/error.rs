use std::{error::Error, fmt, io, path::PathBuf};

use record::{DecodeError, RecordKind};

/// Checked before a load starts, never raised by a running load.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PreconditionError {
    WrongFileKind {
        path: PathBuf,
        expected: RecordKind,
        prefix: String,
    },
    MissingPrerequisite {
        requested: RecordKind,
        required: RecordKind,
    },
    AlreadyLoading,
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PreconditionError::WrongFileKind { path, expected, prefix } => write!(
                f,
                "{} is not a {} file, its name should start with `{}`",
                path.display(), expected, prefix,
            ),
            PreconditionError::MissingPrerequisite { requested, required } => write!(
                f,
                "cannot load {} records before {} records are loaded",
                requested, required,
            ),
            PreconditionError::AlreadyLoading => write!(f, "a load is already running"),
        }
    }
}

impl Error for PreconditionError {}

#[derive(Debug)]
pub enum LoadError {
    Precondition(PreconditionError),
    Io {
        path: PathBuf,
        inner: io::Error,
    },
    Decode {
        /// one-based
        line_number: usize,
        line: String,
        error: DecodeError,
    },
    // the background task panicked
    Interrupted,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Precondition(inner) => write!(f, "{}", inner),
            LoadError::Io { path, inner } => write!(f, "cannot read {}: {}", path.display(), inner),
            LoadError::Decode { line_number, line, error } => {
                write!(f, "line {}: {}: `{}`", line_number, error, line)
            },
            LoadError::Interrupted => write!(f, "the load was interrupted"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Precondition(inner) => Some(inner),
            LoadError::Io { inner, .. } => Some(inner),
            LoadError::Decode { error, .. } => Some(error),
            LoadError::Interrupted => None,
        }
    }
}

impl From<PreconditionError> for LoadError {
    fn from(e: PreconditionError) -> Self {
        LoadError::Precondition(e)
    }
}
