use crate::error::{PemFixtureError, Result};

/// PKCS#8 `PrivateKeyInfo`.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
/// PKCS#8 `EncryptedPrivateKeyInfo`.
pub const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
/// PKCS#1 `RSAPrivateKey`.
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
/// SEC1 `ECPrivateKey`.
pub const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
/// X.509 `SubjectPublicKeyInfo`.
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// A single PEM block: its label and decoded DER contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    pub label: String,
    pub der: Vec<u8>,
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Finds the private key block in `pem_str`.
///
/// Files written by `openssl ecparam -genkey` start with an `EC PARAMETERS`
/// block, so every block is scanned and the first one labelled `... PRIVATE KEY`
/// wins.
pub fn private_key_block(pem_str: &str) -> Result<PemBlock> {
    let blocks = pem::parse_many(pem_str)?;
    let first_label = match blocks.first() {
        Some(block) => block.tag().to_string(),
        None => return Err(PemFixtureError::Pem("no PEM block found".to_string())),
    };

    blocks
        .into_iter()
        .find(|block| block.tag().ends_with(PRIVATE_KEY_LABEL))
        .map(|block| PemBlock {
            label: block.tag().to_string(),
            der: block.into_contents(),
        })
        .ok_or(PemFixtureError::UnsupportedLabel(first_label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_leading_parameter_blocks() {
        let input = format!(
            "{}{}",
            der_to_pem(&[0x06, 0x03, 0x2b, 0x65, 0x70], "EC PARAMETERS"),
            der_to_pem(&[0x30, 0x00], EC_PRIVATE_KEY_LABEL),
        );
        let block = private_key_block(&input).unwrap();
        assert_eq!(block.label, EC_PRIVATE_KEY_LABEL);
        assert_eq!(block.der, vec![0x30, 0x00]);
    }

    #[test]
    fn rejects_non_key_blocks() {
        let input = der_to_pem(&[0x30, 0x00], "CERTIFICATE");
        assert_eq!(
            private_key_block(&input),
            Err(PemFixtureError::UnsupportedLabel("CERTIFICATE".to_string()))
        );
    }

    #[test]
    fn rejects_text_without_pem() {
        assert!(matches!(
            private_key_block("not a key"),
            Err(PemFixtureError::Pem(_))
        ));
    }

    #[test]
    fn der_to_pem_uses_lf_line_endings() {
        let pem = der_to_pem(&[1, 2, 3], PUBLIC_KEY_LABEL);
        assert_eq!(pem, "-----BEGIN PUBLIC KEY-----\nAQID\n-----END PUBLIC KEY-----\n");
    }
}
