use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::{describe_error_code, ErrorCode};
pub use helpers::{common, ErrorExt};

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, GeoTallyError>;

/// The unified error type for geotally
#[derive(Error, Debug)]
pub enum GeoTallyError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Malformed line {line}: {message}")]
    MalformedLine {
        code: u16,
        message: String,
        line: usize,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] I/O error: {message}")]
    Io {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        worker: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GeoTallyError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a malformed line error for a 1-based line number
    pub fn malformed_line(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLine {
            code: ErrorCode::LINE_INVALID_JSON,
            message: message.into(),
            line,
            source: None,
        }
    }

    /// Create an I/O error with default code
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::IO_GENERIC,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an I/O error with specific code and path
    pub fn io_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Io {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an execution error attributed to a worker
    pub fn execution_with_code(code: u16, message: impl Into<String>, worker: Option<usize>) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            worker,
            source: None,
        }
    }

    /// Attach the file the error relates to
    pub fn with_path(mut self, p: impl Into<PathBuf>) -> Self {
        match &mut self {
            Self::Config { path, .. } | Self::Io { path, .. } => *path = Some(p.into()),
            Self::MalformedLine { .. } | Self::Execution { .. } => {}
        }
        self
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::MalformedLine { source: src, .. }
            | Self::Io { source: src, .. }
            | Self::Execution { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::MalformedLine { message, .. }
            | Self::Io { message, .. }
            | Self::Execution { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::MalformedLine { .. } => 3,
            Self::Io { .. } => 4,
            Self::Execution { .. } => 5,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::MalformedLine { code, .. }
            | Self::Io { code, .. }
            | Self::Execution { code, .. } => *code,
        }
    }

    /// Whether the run can continue past this error
    ///
    /// Only line-local failures are recoverable; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedLine { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, path, .. } => match path {
                Some(p) => format!("Configuration problem in {}: {}", p.display(), message),
                None => format!("Configuration problem: {}", message),
            },
            Self::MalformedLine { message, line, .. } => {
                format!("Line {} could not be parsed: {}", line, message)
            }
            Self::Io { message, path, .. } => match path {
                Some(p) => format!("I/O error at {}: {}", p.display(), message),
                None => format!("I/O error: {}", message),
            },
            Self::Execution {
                message, worker, ..
            } => match worker {
                Some(id) => format!("Worker {} failed: {}", id, message),
                None => format!("Execution failed: {}", message),
            },
        }
    }
}
