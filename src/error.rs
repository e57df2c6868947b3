// src/error.rs

//! Error types for galley

use thiserror::Error;

/// Errors that can occur while resolving a recipe or driving a build
#[derive(Error, Debug)]
pub enum Error {
    /// Override value outside the option's declared domain
    #[error("Invalid value '{value}' for option '{option}' (allowed: {allowed})")]
    InvalidOptionValue {
        option: String,
        value: String,
        allowed: String,
    },

    /// Override names an option the recipe does not declare
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// Dependency-scoped override names a dependency absent from requires
    #[error("Option override for '{option}' references unknown dependency '{dependency}'")]
    UnknownDependency { dependency: String, option: String },

    /// Option declared without a default and nothing resolved it
    #[error("Option '{0}' has no default and was not set by any rule or override")]
    UnresolvedOption(String),

    /// A phase was invoked before its prerequisite completed. This is a
    /// defect in the driver, not a user error.
    #[error("Phase '{attempted}' invoked while driver is in state '{state}'")]
    PhaseOrder { attempted: String, state: String },

    /// The external build or install subprocess exited non-zero
    #[error("{tool} exited with status {code}\n{stderr}")]
    ExternalTool {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// Recipe or settings parse failure
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the configuration family of errors (user-actionable)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidOptionValue { .. }
                | Self::UnknownOption(_)
                | Self::UnknownDependency { .. }
                | Self::UnresolvedOption(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
