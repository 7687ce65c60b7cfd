use crate::{
    bundle,
    data::SignerConfig,
    error::{CryptoError, Error, Result},
    utils::writer::write_atomic,
};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha512;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod digest;
pub mod verify;

/// The suffix appended to the name of the signed file.
pub const SIGNATURE_SUFFIX: &str = "-sig.bin";

/// The location of the detached signature for a file.
///
/// This is the same directory, and the file name with [`SIGNATURE_SUFFIX`] appended.
pub fn signature_path(path: impl AsRef<Path>) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(SIGNATURE_SUFFIX);
    PathBuf::from(name)
}

/// Creates RSA PKCS#1 v1.5 signatures over SHA-512 digests.
pub struct Signer {
    key: RsaPrivateKey,
}

impl Signer {
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    /// Extract the key from the configured bundle.
    pub fn from_config(config: &SignerConfig) -> Result<Self> {
        let key =
            bundle::extract_private_key(&config.bundle, &config.passphrase, &config.local_key_id)?;
        Ok(Self::new(key))
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }

    /// Sign the SHA-512 digest of the data.
    pub fn sign_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let digest = digest::sha512(data);

        let signature = self
            .key
            .sign(Pkcs1v15Sign::new::<Sha512>(), &digest)
            .map_err(CryptoError::Rsa)?;

        log::info!("Digest: {}", base16::encode_lower(&digest));
        log::debug!("Signature: {}", base16::encode_lower(&signature));

        Ok(signature)
    }

    /// Sign a file, writing the signature next to it.
    pub fn sign_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(Error::io("read", path))?;

        let signature = self.sign_bytes(&data)?;

        let output = signature_path(path);
        write_atomic(&output, &signature)?;

        log::info!("Signature written to: {}", output.display());

        Ok(output)
    }
}

/// Sign a file with the key from the configured bundle.
///
/// Returns the path of the written signature.
pub fn sign(path: impl AsRef<Path>, config: &SignerConfig) -> Result<PathBuf> {
    let path = path.as_ref();
    log::info!("Signing: {}", path.display());

    Signer::from_config(config)?.sign_file(path)
}
