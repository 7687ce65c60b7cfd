use crate::error::{CryptoError, Error, Result};
use digest::Digest;
use pkcs1::DecodeRsaPublicKey;
use rsa::{
    pkcs1v15::{Signature, VerifyingKey},
    pkcs8::{DecodePublicKey, EncodePublicKey},
    RsaPublicKey,
};
use sha2::Sha512;
use signature::DigestVerifier;
use std::{fs, path::Path};

const PEM_PUBLIC_KEY: &str = "PUBLIC KEY";
const PEM_RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";

/// Checks detached signatures, the way the update client does.
pub struct Verifier {
    key: VerifyingKey<Sha512>,
}

impl Verifier {
    pub fn new(key: RsaPublicKey) -> Self {
        Self {
            key: VerifyingKey::new(key),
        }
    }

    /// Load a public key from PEM, either SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`).
    pub fn from_pem(pem: &str) -> Result<Self> {
        let pem = pem::parse(pem).map_err(|err| CryptoError::PublicKey(err.to_string()))?;

        let key = match pem.tag.as_str() {
            PEM_PUBLIC_KEY => RsaPublicKey::from_public_key_der(&pem.contents)
                .map_err(|err| CryptoError::PublicKey(err.to_string()))?,
            PEM_RSA_PUBLIC_KEY => RsaPublicKey::from_pkcs1_der(&pem.contents)
                .map_err(|err| CryptoError::PublicKey(err.to_string()))?,
            tag => {
                return Err(CryptoError::PublicKey(format!("unexpected PEM type: {tag}")).into());
            }
        };

        Ok(Self::new(key))
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pem = fs::read_to_string(path).map_err(Error::io("read", path))?;
        Self::from_pem(&pem)
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let signature =
            Signature::try_from(signature).map_err(|_| CryptoError::Rsa(rsa::Error::Verification))?;

        self.key
            .verify_digest(Sha512::new_with_prefix(data), &signature)
            .map_err(|_| CryptoError::Rsa(rsa::Error::Verification))?;

        Ok(())
    }

    /// Verify a file against its detached signature.
    pub fn verify_file(&self, path: impl AsRef<Path>, signature: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let signature = signature.as_ref();

        let data = fs::read(path).map_err(Error::io("read", path))?;
        let signature = fs::read(signature).map_err(Error::io("read", signature))?;

        self.verify(&data, &signature)
    }
}

/// Encode a public key as SPKI PEM, for publishing it.
pub fn public_key_pem(key: &RsaPublicKey) -> Result<String> {
    let der = key
        .to_public_key_der()
        .map_err(|err| CryptoError::PublicKey(err.to_string()))?;

    Ok(pem::encode_config(
        &pem::Pem {
            tag: PEM_PUBLIC_KEY.to_string(),
            contents: der.as_bytes().to_vec(),
        },
        pem::EncodeConfig {
            line_ending: pem::LineEnding::LF,
        },
    ))
}
