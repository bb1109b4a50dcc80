//! Error types for the rep tracker.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid calibration: angle_low ({low}) must be finite and below angle_high ({high})")]
    InvalidCalibration { low: f64, high: f64 },

    #[error("Unknown landmark index: {0}")]
    UnknownLandmark(u8),

    #[error("Limb configured more than once: {0}")]
    DuplicateLimb(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_message() {
        let err = Error::InvalidCalibration { low: 90.0, high: 90.0 };
        assert!(err.to_string().contains("90"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
