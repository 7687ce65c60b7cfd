use crate::{data::oid, error::CredentialError};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use der::{Decode, Encode};
use pkcs12::{
    kdf::{derive_key_utf8, Pkcs12KeyType},
    pbe_params::Pkcs12PbeParams,
};
use pkcs8::{pkcs5::EncryptionScheme, spki::AlgorithmIdentifierOwned};
use sha1::Sha1;

type TdesCbcDec = cbc::Decryptor<des::TdesEde3>;

/// Decrypt data protected by one of the password based schemes found in bundles.
///
/// Supported are PBES2 (as written by current OpenSSL) and `pbeWithSHAAnd3-KeyTripleDES-CBC`
/// (older OpenSSL, Windows). Anything else is reported as
/// [`CredentialError::UnsupportedEncryption`].
pub fn decrypt(
    algorithm: &AlgorithmIdentifierOwned,
    ciphertext: &[u8],
    passphrase: &str,
) -> Result<Vec<u8>, CredentialError> {
    log::debug!("Decrypting {} bytes - algorithm: {}", ciphertext.len(), algorithm.oid);

    if algorithm.oid == oid::PBES2 {
        pbes2(algorithm, ciphertext, passphrase)
    } else if algorithm.oid == oid::PBE_SHA1_3DES {
        pbe_sha1_3des(algorithm, ciphertext, passphrase)
    } else {
        Err(CredentialError::UnsupportedEncryption(algorithm.oid))
    }
}

fn pbes2(
    algorithm: &AlgorithmIdentifierOwned,
    ciphertext: &[u8],
    passphrase: &str,
) -> Result<Vec<u8>, CredentialError> {
    let encoded = algorithm.to_der()?;
    let scheme = EncryptionScheme::from_der(&encoded)?;

    scheme
        .decrypt(passphrase, ciphertext)
        .map_err(|err| CredentialError::Decrypt(err.to_string()))
}

fn pbe_sha1_3des(
    algorithm: &AlgorithmIdentifierOwned,
    ciphertext: &[u8],
    passphrase: &str,
) -> Result<Vec<u8>, CredentialError> {
    let params = algorithm
        .parameters
        .as_ref()
        .ok_or_else(|| CredentialError::Decrypt("missing PBE parameters".into()))?
        .decode_as::<Pkcs12PbeParams>()?;

    let salt = params.salt.as_bytes();
    let key = derive_key_utf8::<Sha1>(
        passphrase,
        salt,
        Pkcs12KeyType::EncryptionKey,
        params.iterations,
        24,
    )?;
    let iv = derive_key_utf8::<Sha1>(passphrase, salt, Pkcs12KeyType::Iv, params.iterations, 8)?;

    TdesCbcDec::new_from_slices(&key, &iv)
        .map_err(|err| CredentialError::Decrypt(err.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CredentialError::Decrypt("invalid padding".into()))
}
