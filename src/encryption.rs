//! Password-based PKCS#8 encryption of private keys (PBES2, RFC 8018).

use std::fmt;

use der::zeroize::Zeroizing;
use pkcs8::pkcs5::{self, pbes2};
use pkcs8::{EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo};
use rand_core::{OsRng, RngCore};

use crate::error::{PemFixtureError, Result};
use crate::key::PrivateKey;
use crate::pem_utils::{self, ENCRYPTED_PRIVATE_KEY_LABEL};

/// Passphrase protecting the encrypted key fixtures.
pub const FIXTURE_PASSPHRASE: &str = "test_password";

/// Iteration count OpenSSL uses for PKCS#8 PBKDF2 by default.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 2048;

const SALT_LEN: usize = 16;
const IV_LEN: usize = 16;

/// A passphrase held in zeroizing memory and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(Zeroizing<Vec<u8>>);

impl Passphrase {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Passphrase(Zeroizing::new(bytes.into()))
    }

    /// The passphrase shared by every fixture.
    pub fn fixture() -> Self {
        Self::new(FIXTURE_PASSPHRASE)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Passphrase {
    fn default() -> Self {
        Self::fixture()
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// PBES2 parameter sets used when encrypting a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncryption {
    /// PBKDF2-HMAC-SHA256 key derivation with AES-256-CBC.
    ///
    /// Readable by OpenSSL, .NET and every other PKCS#8 consumer we target.
    Pbkdf2Sha256Aes256Cbc { iterations: u32 },
    /// scrypt key derivation with AES-256-CBC, using the pkcs8 crate's recommended cost.
    ScryptAes256Cbc,
}

impl Default for KeyEncryption {
    fn default() -> Self {
        KeyEncryption::Pbkdf2Sha256Aes256Cbc {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

/// Encryption parameters found in an `ENCRYPTED PRIVATE KEY` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionDetails {
    pub kdf: String,
    /// PBKDF2 iteration count, absent for other KDFs.
    pub iterations: Option<u32>,
    pub cipher: String,
}

impl fmt::Display for EncryptionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.iterations {
            Some(iterations) => write!(
                f,
                "{} ({iterations} iterations), {}",
                self.kdf, self.cipher
            ),
            None => write!(f, "{}, {}", self.kdf, self.cipher),
        }
    }
}

/// Encrypts `key` under `passphrase` and returns an `ENCRYPTED PRIVATE KEY` PEM.
///
/// Every call draws a fresh salt and IV, so two encryptions of the same key differ.
pub fn encrypt_key(
    key: &PrivateKey,
    passphrase: &Passphrase,
    encryption: KeyEncryption,
) -> Result<Zeroizing<String>> {
    let plain = key.to_pkcs8_der()?;
    let info = PrivateKeyInfo::try_from(plain.as_bytes())?;

    let encrypted = match encryption {
        KeyEncryption::Pbkdf2Sha256Aes256Cbc { iterations } => {
            let mut salt = [0u8; SALT_LEN];
            let mut iv = [0u8; IV_LEN];
            OsRng.fill_bytes(&mut salt);
            OsRng.fill_bytes(&mut iv);

            let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(iterations, &salt, &iv)
                .map_err(|e| PemFixtureError::Encryption(e.to_string()))?;
            info.encrypt_with_params(params, passphrase.as_bytes())
        }
        KeyEncryption::ScryptAes256Cbc => info.encrypt(OsRng, passphrase.as_bytes()),
    }
    .map_err(|e| PemFixtureError::Encryption(e.to_string()))?;

    encrypted
        .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
        .map_err(|e| PemFixtureError::Encoding(e.to_string()))
}

/// Re-encodes an unencrypted private key PEM as encrypted PKCS#8.
pub fn encrypt_pem(
    pem_str: &str,
    passphrase: &Passphrase,
    encryption: KeyEncryption,
) -> Result<Zeroizing<String>> {
    let key = PrivateKey::from_pem(pem_str)?;
    encrypt_key(&key, passphrase, encryption)
}

fn encrypted_block(pem_str: &str) -> Result<Zeroizing<Vec<u8>>> {
    let block = pem_utils::private_key_block(pem_str)?;
    if block.label != ENCRYPTED_PRIVATE_KEY_LABEL {
        return Err(PemFixtureError::NotEncrypted(block.label));
    }
    Ok(Zeroizing::new(block.der))
}

/// Decrypts an `ENCRYPTED PRIVATE KEY` PEM into a typed key.
pub fn decrypt_key(pem_str: &str, passphrase: &Passphrase) -> Result<PrivateKey> {
    let der = encrypted_block(pem_str)?;
    let info = EncryptedPrivateKeyInfo::try_from(der.as_slice())?;
    let plain = info
        .decrypt(passphrase.as_bytes())
        .map_err(|e| PemFixtureError::Decryption(e.to_string()))?;

    // A wrong passphrase occasionally yields valid padding; the garbage then fails to decode.
    PrivateKey::from_pkcs8_der(plain.as_bytes()).map_err(|err| match err {
        PemFixtureError::Decoding(msg) => PemFixtureError::Decryption(msg),
        other => other,
    })
}

/// Decrypts an `ENCRYPTED PRIVATE KEY` PEM and re-encodes it as unencrypted PKCS#8.
pub fn decrypt_pem(pem_str: &str, passphrase: &Passphrase) -> Result<Zeroizing<String>> {
    decrypt_key(pem_str, passphrase)?.to_pkcs8_pem()
}

/// Describes the encryption scheme of an `ENCRYPTED PRIVATE KEY` PEM without decrypting it.
pub fn inspect_encrypted_pem(pem_str: &str) -> Result<EncryptionDetails> {
    let der = encrypted_block(pem_str)?;
    let info = EncryptedPrivateKeyInfo::try_from(der.as_slice())?;

    let details = match &info.encryption_algorithm {
        pkcs5::EncryptionScheme::Pbes2(params) => {
            let (kdf, iterations) = match &params.kdf {
                pbes2::Kdf::Pbkdf2(pbkdf2) => ("pbkdf2".to_string(), Some(pbkdf2.iteration_count)),
                pbes2::Kdf::Scrypt(_) => ("scrypt".to_string(), None),
                other => (other.oid().to_string(), None),
            };
            EncryptionDetails {
                kdf,
                iterations,
                cipher: cipher_name(params.encryption.oid()),
            }
        }
        other => EncryptionDetails {
            kdf: "pbes1".to_string(),
            iterations: None,
            cipher: other.oid().to_string(),
        },
    };
    Ok(details)
}

fn cipher_name(oid: pkcs8::ObjectIdentifier) -> String {
    if oid == pbes2::AES_128_CBC_OID {
        "aes-128-cbc".to_string()
    } else if oid == pbes2::AES_192_CBC_OID {
        "aes-192-cbc".to_string()
    } else if oid == pbes2::AES_256_CBC_OID {
        "aes-256-cbc".to_string()
    } else {
        oid.to_string()
    }
}
