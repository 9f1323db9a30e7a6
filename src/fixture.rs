use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use der::zeroize::Zeroizing;
use tracing::{debug, info};

use crate::encryption::{self, EncryptionDetails, KeyEncryption, Passphrase};
use crate::error::{PemFixtureError, Result};
use crate::key::{KeyAlgorithm, PrivateKey};

/// Directory holding the key fixtures, relative to the working directory.
pub const DEFAULT_KEY_DIR: &str = "keys";
pub const PLAIN_KEY_FILE: &str = "test_pvk_private_key.pem";
pub const ENCRYPTED_KEY_FILE: &str = "test_pvk_private_key_encrypted.pem";

/// Locations of the unencrypted and encrypted fixture files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePaths {
    pub plain: PathBuf,
    pub encrypted: PathBuf,
}

impl FixturePaths {
    /// Both fixtures inside `dir`, under their standard file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        FixturePaths {
            plain: dir.join(PLAIN_KEY_FILE),
            encrypted: dir.join(ENCRYPTED_KEY_FILE),
        }
    }
}

impl Default for FixturePaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_KEY_DIR)
    }
}

/// Which way a fixture is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Plain fixture -> encrypted fixture.
    Encrypt,
    /// Encrypted fixture -> plain fixture.
    Decrypt,
    /// Load the encrypted fixture and report on it; writes nothing.
    Check,
}

/// Outcome of a fixture operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// File written (encrypt/decrypt) or read (check).
    pub path: PathBuf,
    pub algorithm: KeyAlgorithm,
    /// `None` for pass-through keys whose PKCS#8 carries no public key.
    pub fingerprint: Option<String>,
    /// Scheme of the encrypted file involved; `None` when plain output was written.
    pub encryption: Option<EncryptionDetails>,
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ", self.path.display(), self.algorithm)?;
        match &self.fingerprint {
            Some(fingerprint) => f.write_str(fingerprint)?,
            None => f.write_str("(no public key)")?,
        }
        if let Some(encryption) = &self.encryption {
            write!(f, " [{encryption}]")?;
        }
        Ok(())
    }
}

/// A single fixture conversion: paths, passphrase and encryption scheme.
///
/// All fields default to the standard fixture setup:
///
/// ```rust
/// use pemfixture::fixture::{FixtureJob, FixturePaths};
///
/// let job = FixtureJob::builder().build();
/// assert_eq!(job.paths, FixturePaths::in_dir("keys"));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct FixtureJob {
    #[builder(default)]
    pub paths: FixturePaths,
    #[builder(default)]
    pub passphrase: Passphrase,
    #[builder(default)]
    pub encryption: KeyEncryption,
}

impl FixtureJob {
    pub fn run(&self, direction: Direction) -> Result<KeyReport> {
        match direction {
            Direction::Encrypt => self.encrypt(),
            Direction::Decrypt => self.decrypt(),
            Direction::Check => self.check(),
        }
    }

    /// Reads the plain fixture and writes it encrypted, overwriting any existing file.
    pub fn encrypt(&self) -> Result<KeyReport> {
        let input = read_fixture(&self.paths.plain)?;
        let key = PrivateKey::from_pem(&input)?;
        debug!(scheme = ?self.encryption, "encrypting key fixture");

        let encrypted = encryption::encrypt_key(&key, &self.passphrase, self.encryption)?;
        write_fixture(&self.paths.encrypted, &encrypted)?;

        let details = encryption::inspect_encrypted_pem(&encrypted)?;
        let report = key_report(&self.paths.encrypted, &key, Some(details))?;
        info!(
            path = %report.path.display(),
            algorithm = %report.algorithm,
            fingerprint = ?report.fingerprint,
            "wrote encrypted key fixture"
        );
        Ok(report)
    }

    /// Reads the encrypted fixture and writes it as unencrypted PKCS#8, overwriting any existing file.
    pub fn decrypt(&self) -> Result<KeyReport> {
        let input = read_fixture(&self.paths.encrypted)?;
        let key = encryption::decrypt_key(&input, &self.passphrase)?;

        let plain = key.to_pkcs8_pem()?;
        write_fixture(&self.paths.plain, &plain)?;

        let report = key_report(&self.paths.plain, &key, None)?;
        info!(
            path = %report.path.display(),
            algorithm = %report.algorithm,
            fingerprint = ?report.fingerprint,
            "wrote decrypted key fixture"
        );
        Ok(report)
    }

    /// Loads the encrypted fixture with the passphrase, as its consumers do.
    pub fn check(&self) -> Result<KeyReport> {
        let input = read_fixture(&self.paths.encrypted)?;
        let details = encryption::inspect_encrypted_pem(&input)?;
        let key = encryption::decrypt_key(&input, &self.passphrase)?;

        let report = key_report(&self.paths.encrypted, &key, Some(details))?;
        info!(
            path = %report.path.display(),
            algorithm = %report.algorithm,
            fingerprint = ?report.fingerprint,
            "encrypted key fixture is readable"
        );
        Ok(report)
    }
}

fn key_report(
    path: &Path,
    key: &PrivateKey,
    encryption: Option<EncryptionDetails>,
) -> Result<KeyReport> {
    let fingerprint = match key.fingerprint() {
        Ok(fingerprint) => Some(fingerprint),
        Err(PemFixtureError::UnsupportedAlgorithm(reason)) => {
            debug!(%reason, "key has no fingerprint");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(KeyReport {
        path: path.to_path_buf(),
        algorithm: key.algorithm(),
        fingerprint,
        encryption,
    })
}

fn read_fixture(path: &Path) -> Result<Zeroizing<String>> {
    debug!(path = %path.display(), "reading key fixture");
    fs::read_to_string(path)
        .map(Zeroizing::new)
        .map_err(|e| PemFixtureError::io(path, e))
}

fn write_fixture(path: &Path, pem: &str) -> Result<()> {
    fs::write(path, pem.as_bytes()).map_err(|e| PemFixtureError::io(path, e))
}
