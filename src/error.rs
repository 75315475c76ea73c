//! Error types for tagson conversions.
//!
//! Only resource-level failures surface as [`Error`] values. Everything the
//! converter can recover from (unknown tags, misplaced text, bad values,
//! duplicate objects) is recorded as a [`Diagnostic`](crate::Diagnostic)
//! instead, and the run carries on.
//!
//! ## Error Categories
//!
//! - **Input errors**: the input file is missing or cannot be read
//! - **Output errors**: the output or log file cannot be created
//! - **Schema errors**: a schema tree or output shape is malformed
//! - **Empty output**: nothing survived validation
//!
//! ## Examples
//!
//! ```rust
//! use tagson::Error;
//!
//! let err = Error::input_not_found("input.xml");
//! assert!(err.to_string().contains("input.xml"));
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Represents all resource-level failures of a conversion run.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The input file does not exist
    #[error("Could not find {path} file")]
    InputNotFound { path: String },

    /// The input file exists but could not be opened or decoded
    #[error("Unable to open {path} file: {msg}")]
    InputUnreadable { path: String, msg: String },

    /// The output file could not be created or written
    #[error("Unable to create {path} file: {msg}")]
    OutputUnwritable { path: String, msg: String },

    /// The diagnostics log could not be appended to
    #[error("Unable to create {path} file: {msg}")]
    LogUnwritable { path: String, msg: String },

    /// The schema tree violates a structural rule
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The output shape names tags the schema does not provide
    #[error("Invalid output shape: {0}")]
    InvalidShape(String),

    /// No object survived validation
    #[error("Nothing to write: no valid objects were found")]
    NothingToWrite,
}

impl Error {
    /// Creates an I/O error from any error message.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an error for a missing input file.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Error;
    ///
    /// let err = Error::input_not_found("data.xml");
    /// assert_eq!(err.to_string(), "Could not find data.xml file");
    /// ```
    pub fn input_not_found(path: impl AsRef<Path>) -> Self {
        Error::InputNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Creates an error for an input file that could not be opened or read.
    pub fn input_unreadable(path: impl AsRef<Path>, err: impl fmt::Display) -> Self {
        Error::InputUnreadable {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Creates an error for an output file that could not be written.
    pub fn output_unwritable(path: impl AsRef<Path>, err: impl fmt::Display) -> Self {
        Error::OutputUnwritable {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Creates an error for a log file that could not be appended to.
    pub fn log_unwritable(path: impl AsRef<Path>, err: impl fmt::Display) -> Self {
        Error::LogUnwritable {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Creates a schema error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Error;
    ///
    /// let err = Error::invalid_schema("tag must not be empty");
    /// assert!(err.to_string().contains("tag must not be empty"));
    /// ```
    pub fn invalid_schema<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidSchema(msg.to_string())
    }

    /// Creates an output shape error.
    pub fn invalid_shape<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidShape(msg.to_string())
    }

    /// Returns `true` for failures that concern the input resource.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::InputNotFound { .. } | Error::InputUnreadable { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidSchema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_messages_name_the_path() {
        let err = Error::output_unwritable("out/output.json", "permission denied");
        assert_eq!(
            err.to_string(),
            "Unable to create out/output.json file: permission denied"
        );

        let err = Error::input_unreadable("input.xml", "stream did not contain valid UTF-8");
        assert!(err.is_input());
        assert!(err.to_string().starts_with("Unable to open input.xml file"));
    }

    #[test]
    fn test_io_and_empty_output_messages() {
        assert_eq!(
            Error::io("stream did not contain valid UTF-8").to_string(),
            "IO error: stream did not contain valid UTF-8"
        );
        assert_eq!(
            Error::NothingToWrite.to_string(),
            "Nothing to write: no valid objects were found"
        );
        assert!(!Error::invalid_shape("x").is_input());
    }

    #[test]
    fn test_json_errors_become_schema_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
        assert!(!err.is_input());
    }
}
