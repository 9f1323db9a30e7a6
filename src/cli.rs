use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pemfixture::fixture::Direction;

/// Convert the PEM private key test fixture to or from encrypted PKCS#8.
#[derive(Parser, Debug)]
#[command(name = "pem-fixture", version)]
pub struct Cli {
    /// Conversion to perform.
    #[arg(value_enum)]
    pub mode: Mode,
    /// Directory holding test_pvk_private_key.pem and test_pvk_private_key_encrypted.pem.
    pub key_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Encrypt the plain fixture with the fixture passphrase.
    Encrypt,
    /// Decrypt the encrypted fixture back to plain PKCS#8.
    Decrypt,
    /// Verify the encrypted fixture opens with the fixture passphrase.
    Check,
}

impl From<Mode> for Direction {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Encrypt => Direction::Encrypt,
            Mode::Decrypt => Direction::Decrypt,
            Mode::Check => Direction::Check,
        }
    }
}
