use der::oid::ObjectIdentifier;
use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// Failures opening the bundle or locating the signing key in it
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("malformed bundle: {0}")]
    Asn1(#[from] der::Error),
    #[error("unsupported integrity mode: {0}")]
    UnsupportedIntegrityMode(ObjectIdentifier),
    #[error("unsupported MAC algorithm: {0}")]
    UnsupportedMac(ObjectIdentifier),
    #[error("integrity check failed, wrong passphrase or corrupt bundle")]
    IntegrityCheck,
    #[error("unsupported encryption algorithm: {0}")]
    UnsupportedEncryption(ObjectIdentifier),
    #[error("failed to decrypt: {0}")]
    Decrypt(String),
    #[error("no key bag with local key id {0}")]
    KeyNotFound(String),
    #[error("{count} key bags share the local key id {id}")]
    AmbiguousKey { id: String, count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    PrivateKey(#[source] pkcs8::Error),
    #[error("invalid public key: {0}")]
    PublicKey(String),
    #[error(transparent)]
    Rsa(#[from] rsa::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
