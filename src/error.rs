//! Error types for pemfixture.
//!
//! ```rust
//! use pemfixture::error::PemFixtureError;
//!
//! let err = PemFixtureError::UnsupportedLabel("CERTIFICATE".to_string());
//! assert_eq!(err.to_string(), "Unsupported PEM label: CERTIFICATE");
//! ```

use std::path::Path;

use thiserror::Error;

/// Represents errors that can occur while loading, converting or writing key fixtures.
///
/// Variants carry rendered messages so the type stays `Clone`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PemFixtureError {
    /// Reading or writing a fixture file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The input is not well-formed PEM.
    #[error("Failed to parse PEM: {0}")]
    Pem(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    Decoding(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    Encoding(String),

    /// The PEM block does not hold a private key.
    #[error("Unsupported PEM label: {0}")]
    UnsupportedLabel(String),

    /// The private key algorithm (or curve) is not one we handle.
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// An unencrypted key was expected but the input is `ENCRYPTED PRIVATE KEY`.
    #[error("Key is already encrypted")]
    AlreadyEncrypted,

    /// An encrypted key was expected but the input carries another label.
    #[error("Key is not encrypted (found PEM label {0})")]
    NotEncrypted(String),

    /// Error while encrypting a key.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong passphrase or a corrupt encrypted key.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),
}

impl PemFixtureError {
    /// Wraps an `std::io::Error` together with the path it happened on.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        PemFixtureError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<der::Error> for PemFixtureError {
    /// Converts a `der::Error` into a `PemFixtureError`.
    fn from(err: der::Error) -> Self {
        PemFixtureError::Decoding(err.to_string())
    }
}

impl From<pkcs8::Error> for PemFixtureError {
    fn from(err: pkcs8::Error) -> Self {
        PemFixtureError::Decoding(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for PemFixtureError {
    fn from(err: pkcs8::spki::Error) -> Self {
        PemFixtureError::Encoding(err.to_string())
    }
}

impl From<pem::PemError> for PemFixtureError {
    fn from(err: pem::PemError) -> Self {
        PemFixtureError::Pem(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for PemFixtureError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        PemFixtureError::Decoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PemFixtureError>;
