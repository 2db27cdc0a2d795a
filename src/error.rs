use miette::Diagnostic;
use thiserror::Error;

/// Result type for try/catch reconstruction
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the try/catch region pass
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(trycatch_regions::io_error))]
    Io(String),

    #[error("Invalid JSON input: {0}")]
    #[diagnostic(code(trycatch_regions::json_error))]
    Json(String),

    #[error("Invalid method description: {message}")]
    #[diagnostic(code(trycatch_regions::invalid_input))]
    InvalidInput { message: String },

    #[error("Exception block dominator not found, method: {method}. blocks: {blocks:?}")]
    #[diagnostic(
        code(trycatch_regions::structural_inconsistency),
        help("the protected blocks of a try-block must share exactly one nearest dominator; unreachable or irregular exception ranges break this")
    )]
    StructuralInconsistency { method: String, blocks: Vec<usize> },

    #[error("Try/catch wrap count limit reached in {method} after {passes} passes")]
    #[diagnostic(code(trycatch_regions::wrap_limit))]
    WrapLimitReached { method: String, passes: usize },

    #[error("Region tree is inconsistent: {message}")]
    #[diagnostic(code(trycatch_regions::region_tree))]
    RegionTree { message: String },

    #[error("Unknown method: {name}")]
    #[diagnostic(code(trycatch_regions::unknown_method))]
    UnknownMethod { name: String },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a region tree consistency error
    pub fn region_tree(message: impl Into<String>) -> Self {
        Error::RegionTree {
            message: message.into(),
        }
    }

    /// Whether this error aborts try/catch reconstruction for the method
    pub fn is_fatal_for_method(&self) -> bool {
        matches!(
            self,
            Error::StructuralInconsistency { .. }
                | Error::WrapLimitReached { .. }
                | Error::RegionTree { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
