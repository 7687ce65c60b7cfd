use crate::error::{Error, Result};
use digest::{Digest, Output};
use sha2::{Sha256, Sha384, Sha512};
use std::{fs, path::Path};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    #[default]
    Sha512,
}

impl DigestAlgorithm {
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// The digest signatures are created over.
pub fn sha512(data: &[u8]) -> Output<Sha512> {
    let digest = Sha512::digest(data);

    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "Digested {} bytes - sha512: {}",
            data.len(),
            base16::encode_lower(&digest)
        );
    }

    digest
}

/// Digest the full content of a file.
pub fn digest_file(path: impl AsRef<Path>, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(Error::io("read", path))?;
    Ok(algorithm.apply(&data))
}
