use std::fs;
use std::sync::OnceLock;

use pemfixture::fixture::FixturePaths;
use pemfixture::key::PrivateKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use tempfile::TempDir;

#[allow(dead_code)]
/// A scratch key directory with the plain fixture written from `pem`.
pub fn plain_fixture(pem: &str) -> (TempDir, FixturePaths) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let paths = FixturePaths::in_dir(dir.path());
    fs::write(&paths.plain, pem).expect("Failed to write plain fixture");
    (dir, paths)
}

/// RSA generation is slow in debug builds, so every test shares one key (as PKCS#1 PEM).
#[allow(dead_code)]
pub fn rsa_pkcs1_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        let PrivateKey::Rsa { private } = PrivateKey::generate_rsa(1024).unwrap() else {
            unreachable!()
        };
        private
            .to_pkcs1_pem(pkcs8::LineEnding::LF)
            .unwrap()
            .to_string()
    })
}

#[allow(dead_code)]
pub fn non_rsa_keys() -> Vec<PrivateKey> {
    vec![
        PrivateKey::generate_ecdsa_p256(),
        PrivateKey::generate_ecdsa_p384(),
        PrivateKey::generate_ecdsa_p521(),
        PrivateKey::generate_ed25519(),
    ]
}
