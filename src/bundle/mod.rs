//! Access to the signing key stored in a PKCS#12 bundle

use crate::{
    data::{oid, BagKind, LocalKeyId, SafeBagExt},
    error::{CredentialError, CryptoError, Error, Result},
};
use cms::{content_info::ContentInfo, encrypted_data::EncryptedData};
use der::{asn1::OctetString, Decode, Encode};
use pkcs12::{
    pbe_params::EncryptedPrivateKeyInfo,
    pfx::Pfx,
    safe_bag::{SafeBag, SafeContents},
};
use pkcs8::PrivateKeyInfo;
use rsa::{traits::PublicKeyParts, RsaPrivateKey};
use std::{fs, path::Path};

mod decrypt;
mod mac;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decrypt::decrypt;

/// The decoded content of a bundle.
#[derive(Clone, Debug)]
pub struct Bundle {
    bags: Vec<SafeBag>,
}

impl Bundle {
    /// Read and decode a bundle file.
    pub fn open(path: impl AsRef<Path>, passphrase: &str) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading bundle: {}", path.display());

        let data = fs::read(path).map_err(Error::io("read bundle", path))?;
        Ok(Self::parse(&data, passphrase)?)
    }

    /// Decode a bundle, checking its integrity and decrypting the safe contents.
    ///
    /// Key bags stay encrypted until they are requested through [`Bundle::private_key`].
    pub fn parse(data: &[u8], passphrase: &str) -> std::result::Result<Self, CredentialError> {
        let pfx = Pfx::from_der(data)?;

        // only password integrity mode, public key integrity uses signedData
        if pfx.auth_safe.content_type != oid::DATA {
            return Err(CredentialError::UnsupportedIntegrityMode(
                pfx.auth_safe.content_type,
            ));
        }

        let auth_safe = pfx.auth_safe.content.decode_as::<OctetString>()?;

        match &pfx.mac_data {
            Some(mac_data) => mac::verify(mac_data, passphrase, auth_safe.as_bytes())?,
            None => log::warn!("Bundle has no MAC, skipping integrity check"),
        }

        let mut bags = Vec::new();

        for content in Vec::<ContentInfo>::from_der(auth_safe.as_bytes())? {
            if content.content_type == oid::DATA {
                let data = content.content.decode_as::<OctetString>()?;
                bags.extend(SafeContents::from_der(data.as_bytes())?);
            } else if content.content_type == oid::ENCRYPTED_DATA {
                let encrypted = content.content.decode_as::<EncryptedData>()?;
                match decrypt_contents(&encrypted, passphrase) {
                    Ok(Some(data)) => bags.extend(SafeContents::from_der(&data)?),
                    Ok(None) => log::debug!("Skipping encrypted data without content"),
                    Err(CredentialError::UnsupportedEncryption(algorithm)) => {
                        // usually RC2-40, which only ever holds certificates
                        log::warn!(
                            "Skipping safe contents encrypted with unsupported algorithm: {algorithm}"
                        );
                    }
                    Err(err) => return Err(err),
                }
            } else {
                log::warn!("Skipping safe contents of type: {}", content.content_type);
            }
        }

        log::debug!("Bundle contains {} bags", bags.len());

        Ok(Self { bags })
    }

    pub fn bags(&self) -> &[SafeBag] {
        &self.bags
    }

    /// Find the one key bag with the given local key id and decrypt it.
    ///
    /// It is an error if there is no such bag, or more than one.
    pub fn private_key(&self, id: &LocalKeyId, passphrase: &str) -> Result<RsaPrivateKey> {
        let candidates = self
            .bags
            .iter()
            .filter(|bag| bag.kind().is_key() && bag.local_key_id().as_ref() == Some(id))
            .collect::<Vec<_>>();

        let bag = match candidates.as_slice() {
            [bag] => *bag,
            [] => return Err(CredentialError::KeyNotFound(id.to_string()).into()),
            _ => {
                return Err(CredentialError::AmbiguousKey {
                    id: id.to_string(),
                    count: candidates.len(),
                }
                .into())
            }
        };

        if let Some(name) = bag.friendly_name() {
            log::debug!("Key bag friendly name: {name}");
        }

        let value = bag.value().map_err(CredentialError::from)?;

        let key = match bag.kind() {
            BagKind::ShroudedPrivateKey => {
                let encrypted = value
                    .decode_as::<EncryptedPrivateKeyInfo>()
                    .map_err(CredentialError::from)?;
                let der = decrypt(
                    &encrypted.encryption_algorithm,
                    encrypted.encrypted_data.as_bytes(),
                    passphrase,
                )?;
                // a wrong passphrase may still produce valid padding, but never a valid key
                let info = PrivateKeyInfo::try_from(der.as_slice()).map_err(|_| {
                    CredentialError::Decrypt("decrypted key is malformed".into())
                })?;
                RsaPrivateKey::try_from(info).map_err(CryptoError::PrivateKey)?
            }
            _ => {
                let der = value.to_der().map_err(CredentialError::from)?;
                let info = PrivateKeyInfo::try_from(der.as_slice())
                    .map_err(CryptoError::PrivateKey)?;
                RsaPrivateKey::try_from(info).map_err(CryptoError::PrivateKey)?
            }
        };

        log::info!("Using key {id} ({} bit RSA)", key.size() * 8);

        Ok(key)
    }
}

/// Decrypt encrypted safe contents, `None` if there is no content at all.
fn decrypt_contents(
    encrypted: &EncryptedData,
    passphrase: &str,
) -> std::result::Result<Option<Vec<u8>>, CredentialError> {
    let info = &encrypted.enc_content_info;
    info.encrypted_content
        .as_ref()
        .map(|content| decrypt(&info.content_enc_alg, content.as_bytes(), passphrase))
        .transpose()
}

/// Load the bundle and extract the signing key.
pub fn extract_private_key(
    path: impl AsRef<Path>,
    passphrase: &str,
    id: &LocalKeyId,
) -> Result<RsaPrivateKey> {
    Bundle::open(path, passphrase)?.private_key(id, passphrase)
}
