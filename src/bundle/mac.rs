use crate::{data::oid, error::CredentialError};
use der::oid::ObjectIdentifier;
use digest::{core_api::BlockSizeUser, Digest};
use hmac::{Mac, SimpleHmac};
use pkcs12::{
    kdf::{derive_key_utf8, Pkcs12KeyType},
    mac_data::MacData,
};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

/// The digests a bundle MAC can be based on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MacAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl MacAlgorithm {
    pub fn from_oid(oid: ObjectIdentifier) -> Result<Self, CredentialError> {
        if oid == oid::SHA1 {
            Ok(Self::Sha1)
        } else if oid == oid::SHA256 {
            Ok(Self::Sha256)
        } else if oid == oid::SHA384 {
            Ok(Self::Sha384)
        } else if oid == oid::SHA512 {
            Ok(Self::Sha512)
        } else {
            Err(CredentialError::UnsupportedMac(oid))
        }
    }

    /// Derive the MAC key, as described in RFC 7292, Appendix B.
    fn derive_key(
        &self,
        passphrase: &str,
        salt: &[u8],
        iterations: i32,
    ) -> Result<Vec<u8>, CredentialError> {
        let id = Pkcs12KeyType::Mac;
        Ok(match self {
            Self::Sha1 => derive_key_utf8::<Sha1>(passphrase, salt, id, iterations, 20)?,
            Self::Sha256 => derive_key_utf8::<Sha256>(passphrase, salt, id, iterations, 32)?,
            Self::Sha384 => derive_key_utf8::<Sha384>(passphrase, salt, id, iterations, 48)?,
            Self::Sha512 => derive_key_utf8::<Sha512>(passphrase, salt, id, iterations, 64)?,
        })
    }

    /// Compute the MAC, for building bundles in tests.
    #[cfg(test)]
    pub fn compute(
        &self,
        passphrase: &str,
        salt: &[u8],
        iterations: i32,
        content: &[u8],
    ) -> Result<Vec<u8>, CredentialError> {
        let key = self.derive_key(passphrase, salt, iterations)?;
        Ok(match self {
            Self::Sha1 => hmac::<Sha1>(&key, content)?.finalize().into_bytes().to_vec(),
            Self::Sha256 => hmac::<Sha256>(&key, content)?.finalize().into_bytes().to_vec(),
            Self::Sha384 => hmac::<Sha384>(&key, content)?.finalize().into_bytes().to_vec(),
            Self::Sha512 => hmac::<Sha512>(&key, content)?.finalize().into_bytes().to_vec(),
        })
    }

    pub fn verify(
        &self,
        passphrase: &str,
        salt: &[u8],
        iterations: i32,
        content: &[u8],
        expected: &[u8],
    ) -> Result<(), CredentialError> {
        let key = self.derive_key(passphrase, salt, iterations)?;
        let result = match self {
            Self::Sha1 => hmac::<Sha1>(&key, content)?.verify_slice(expected),
            Self::Sha256 => hmac::<Sha256>(&key, content)?.verify_slice(expected),
            Self::Sha384 => hmac::<Sha384>(&key, content)?.verify_slice(expected),
            Self::Sha512 => hmac::<Sha512>(&key, content)?.verify_slice(expected),
        };
        result.map_err(|_| CredentialError::IntegrityCheck)
    }
}

fn hmac<D>(key: &[u8], content: &[u8]) -> Result<SimpleHmac<D>, CredentialError>
where
    D: Digest + BlockSizeUser,
{
    let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key)
        .map_err(|err| CredentialError::Decrypt(err.to_string()))?;
    mac.update(content);
    Ok(mac)
}

/// Verify the integrity of the authenticated safe against the bundle's MAC.
pub fn verify(
    mac_data: &MacData,
    passphrase: &str,
    content: &[u8],
) -> Result<(), CredentialError> {
    let algorithm = MacAlgorithm::from_oid(mac_data.mac.algorithm.oid)?;

    log::debug!(
        "Verifying MAC - algorithm: {algorithm:?}, iterations: {}",
        mac_data.iterations
    );

    algorithm.verify(
        passphrase,
        mac_data.mac_salt.as_bytes(),
        mac_data.iterations,
        content,
        mac_data.mac.digest.as_bytes(),
    )
}
