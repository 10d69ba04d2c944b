// Copyright 2026 Unified Noise Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the master-equation engine.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types.
#[derive(Debug)]
pub enum Error {
    /// A density matrix or vector does not match the truncation size.
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Time grid is not a usable non-decreasing sequence.
    InvalidTimeGrid(String),
    /// Solver, parameter, or jump-term configuration is invalid.
    InvalidConfiguration(String),
    /// Numerical failure (non-finite values, singular Padé denominator)
    Numerical(String),
    /// Configuration file error
    Config(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch { expected, actual } => write!(
                f,
                "Shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Error::InvalidTimeGrid(msg) => write!(f, "Invalid time grid: {}", msg),
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Numerical(msg) => write!(f, "Numerical error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Shape mismatch for a flattened vector of the given length.
    pub(crate) fn vector_length(expected: usize, actual: usize) -> Self {
        Error::ShapeMismatch {
            expected: (expected, 1),
            actual: (actual, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display_shape_mismatch() {
        let e = Error::ShapeMismatch {
            expected: (10, 10),
            actual: (4, 5),
        };
        assert_eq!(e.to_string(), "Shape mismatch: expected 10x10, got 4x5");
    }

    #[test]
    fn test_error_display_time_grid() {
        let e = Error::InvalidTimeGrid("t[2] < t[1]".into());
        assert_eq!(e.to_string(), "Invalid time grid: t[2] < t[1]");
    }

    #[test]
    fn test_error_display_invalid_configuration() {
        let e = Error::InvalidConfiguration("missing adjoint".into());
        assert_eq!(e.to_string(), "Invalid configuration: missing adjoint");
    }

    #[test]
    fn test_error_display_numerical() {
        let e = Error::Numerical("singular denominator".into());
        assert_eq!(e.to_string(), "Numerical error: singular denominator");
    }

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("truncation must be > 0".into());
        assert_eq!(e.to_string(), "Configuration error: truncation must be > 0");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    #[test]
    fn test_vector_length_helper() {
        let e = Error::vector_length(100, 99);
        assert!(matches!(
            e,
            Error::ShapeMismatch {
                expected: (100, 1),
                actual: (99, 1)
            }
        ));
    }

    #[test]
    fn test_error_source() {
        assert!(Error::Io(std::io::Error::other("disk")).source().is_some());
        assert!(Error::InvalidTimeGrid("x".into()).source().is_none());
        assert!(Error::Serialization("x".into()).source().is_none());
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
