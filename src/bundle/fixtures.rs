//! Build bundles for tests, the way OpenSSL lays them out.

use super::mac::MacAlgorithm;
use crate::data::{oid, LocalKeyId};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use cms::{
    content_info::{CmsVersion, ContentInfo},
    encrypted_data::EncryptedData,
    enveloped_data::EncryptedContentInfo,
};
use der::{
    asn1::{Any, OctetString, SetOfVec},
    oid::ObjectIdentifier,
    Encode,
};
use pkcs12::{
    cert_type::CertBag,
    digest_info::DigestInfo,
    kdf::{derive_key_utf8, Pkcs12KeyType},
    mac_data::MacData,
    pbe_params::{EncryptedPrivateKeyInfo, Pkcs12PbeParams},
    pfx::{Pfx, Version},
    safe_bag::SafeBag,
};
use pkcs8::{pkcs5::pbes2, spki::AlgorithmIdentifierOwned, EncodePrivateKey, PrivateKeyInfo};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use std::sync::OnceLock;
use x509_cert::attr::Attribute;

const SALT: [u8; 16] = *b"0123456789abcdef";
const IV: [u8; 16] = *b"fedcba9876543210";
const ITERATIONS: u32 = 1024;

type TdesCbcEnc = cbc::Encryptor<des::TdesEde3>;

fn generate() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap()
}

/// The key used for signing in tests
pub fn key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(generate)
}

/// Some other key, sharing a bundle with [`key`]
pub fn other_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(generate)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Protection {
    /// a plain `keyBag`
    Plain,
    /// `pkcs8ShroudedKeyBag` using PBES2, PBKDF2-SHA256 and AES-256-CBC
    Pbes2,
    /// `pkcs8ShroudedKeyBag` using `pbeWithSHAAnd3-KeyTripleDES-CBC`
    Legacy3Des,
}

pub fn encrypt_3des(passphrase: &str, plaintext: &[u8]) -> (AlgorithmIdentifierOwned, Vec<u8>) {
    let iterations = ITERATIONS as i32;
    let key = derive_key_utf8::<Sha1>(
        passphrase,
        &SALT,
        Pkcs12KeyType::EncryptionKey,
        iterations,
        24,
    )
    .unwrap();
    let iv = derive_key_utf8::<Sha1>(passphrase, &SALT, Pkcs12KeyType::Iv, iterations, 8).unwrap();

    let ciphertext = TdesCbcEnc::new_from_slices(&key, &iv)
        .unwrap()
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let params = Pkcs12PbeParams {
        salt: OctetString::new(SALT.to_vec()).unwrap(),
        iterations,
    };
    let algorithm = AlgorithmIdentifierOwned {
        oid: oid::PBE_SHA1_3DES,
        parameters: Some(Any::encode_from(&params).unwrap()),
    };

    (algorithm, ciphertext)
}

fn attributes(id: Option<&LocalKeyId>) -> Option<SetOfVec<Attribute>> {
    let id = id?;
    let value = Any::encode_from(&OctetString::new(id.as_bytes()).unwrap()).unwrap();
    let attribute = Attribute {
        oid: oid::LOCAL_KEY_ID,
        values: SetOfVec::try_from(vec![value]).unwrap(),
    };
    Some(SetOfVec::try_from(vec![attribute]).unwrap())
}

/// Create a key bag. The bag value is the plain DER, the `[0]` tag gets added when encoding.
pub fn key_bag(
    key: &RsaPrivateKey,
    id: Option<&LocalKeyId>,
    protection: Protection,
    passphrase: &str,
) -> SafeBag {
    let pkcs8 = key.to_pkcs8_der().unwrap();

    let (bag_id, bag_value) = match protection {
        Protection::Plain => (oid::KEY_BAG, pkcs8.as_bytes().to_vec()),
        Protection::Pbes2 => {
            let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(ITERATIONS, &SALT, &IV).unwrap();
            let encrypted = PrivateKeyInfo::try_from(pkcs8.as_bytes())
                .unwrap()
                .encrypt_with_params(params, passphrase)
                .unwrap();
            (oid::PKCS8_SHROUDED_KEY_BAG, encrypted.as_bytes().to_vec())
        }
        Protection::Legacy3Des => {
            let (encryption_algorithm, ciphertext) = encrypt_3des(passphrase, pkcs8.as_bytes());
            let encrypted = EncryptedPrivateKeyInfo {
                encryption_algorithm,
                encrypted_data: OctetString::new(ciphertext).unwrap(),
            };
            (oid::PKCS8_SHROUDED_KEY_BAG, encrypted.to_der().unwrap())
        }
    };

    SafeBag {
        bag_id,
        bag_value,
        bag_attributes: attributes(id),
    }
}

pub fn cert_bag(certificate: &[u8], id: Option<&LocalKeyId>) -> SafeBag {
    let bag = CertBag {
        cert_id: oid::X509_CERTIFICATE,
        cert_value: OctetString::new(certificate).unwrap(),
    };
    SafeBag {
        bag_id: oid::CERT_BAG,
        bag_value: bag.to_der().unwrap(),
        bag_attributes: attributes(id),
    }
}

fn data_content(bags: &Vec<SafeBag>) -> ContentInfo {
    let data = OctetString::new(bags.to_der().unwrap()).unwrap();
    ContentInfo {
        content_type: oid::DATA,
        content: Any::encode_from(&data).unwrap(),
    }
}

fn encrypted_content(
    algorithm: AlgorithmIdentifierOwned,
    ciphertext: Option<Vec<u8>>,
) -> ContentInfo {
    let encrypted = EncryptedData {
        version: CmsVersion::V0,
        enc_content_info: EncryptedContentInfo {
            content_type: oid::DATA,
            content_enc_alg: algorithm,
            encrypted_content: ciphertext.map(|data| OctetString::new(data).unwrap()),
        },
        unprotected_attrs: None,
    };
    ContentInfo {
        content_type: oid::ENCRYPTED_DATA,
        content: Any::encode_from(&encrypted).unwrap(),
    }
}

/// Assemble a bundle.
///
/// Key bags go into plain safe contents, certificates (and keys added with
/// [`BundleBuilder::encrypted_key`]) into 3DES encrypted contents.
pub struct BundleBuilder {
    passphrase: String,
    mac: Option<ObjectIdentifier>,
    bags: Vec<SafeBag>,
    encrypted_bags: Vec<SafeBag>,
    unsupported: bool,
    empty: bool,
}

impl BundleBuilder {
    pub fn new(passphrase: &str) -> Self {
        Self {
            passphrase: passphrase.to_string(),
            mac: Some(oid::SHA256),
            bags: Vec::new(),
            encrypted_bags: Vec::new(),
            unsupported: false,
            empty: false,
        }
    }

    pub fn mac(mut self, mac: Option<ObjectIdentifier>) -> Self {
        self.mac = mac;
        self
    }

    pub fn key(
        mut self,
        key: &RsaPrivateKey,
        id: Option<&LocalKeyId>,
        protection: Protection,
    ) -> Self {
        let bag = key_bag(key, id, protection, &self.passphrase);
        self.bags.push(bag);
        self
    }

    /// Add a plain key bag to the encrypted contents.
    pub fn encrypted_key(mut self, key: &RsaPrivateKey, id: Option<&LocalKeyId>) -> Self {
        let bag = key_bag(key, id, Protection::Plain, &self.passphrase);
        self.encrypted_bags.push(bag);
        self
    }

    pub fn certificate(mut self, certificate: &[u8], id: Option<&LocalKeyId>) -> Self {
        self.encrypted_bags.push(cert_bag(certificate, id));
        self
    }

    /// Add safe contents encrypted with RC2-40, which can't be read.
    pub fn unsupported_contents(mut self) -> Self {
        self.unsupported = true;
        self
    }

    /// Add encrypted data which has no encrypted content.
    pub fn empty_encrypted_contents(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut contents = Vec::new();

        if !self.bags.is_empty() {
            contents.push(data_content(&self.bags));
        }

        if !self.encrypted_bags.is_empty() {
            let plaintext = self.encrypted_bags.to_der().unwrap();
            let (algorithm, ciphertext) = encrypt_3des(&self.passphrase, &plaintext);
            contents.push(encrypted_content(algorithm, Some(ciphertext)));
        }

        if self.empty {
            let (algorithm, _) = encrypt_3des(&self.passphrase, &[]);
            contents.push(encrypted_content(algorithm, None));
        }

        if self.unsupported {
            let params = Pkcs12PbeParams {
                salt: OctetString::new(SALT.to_vec()).unwrap(),
                iterations: ITERATIONS as i32,
            };
            let algorithm = AlgorithmIdentifierOwned {
                oid: oid::PBE_SHA1_RC2_40,
                parameters: Some(Any::encode_from(&params).unwrap()),
            };
            contents.push(encrypted_content(algorithm, Some(vec![0u8; 32])));
        }

        let auth_safe = contents.to_der().unwrap();

        let mac_data = self.mac.map(|algorithm| MacData {
            mac: DigestInfo {
                algorithm: AlgorithmIdentifierOwned {
                    oid: algorithm,
                    parameters: None,
                },
                digest: OctetString::new(
                    MacAlgorithm::from_oid(algorithm)
                        .unwrap()
                        .compute(&self.passphrase, &SALT[..8], 2048, &auth_safe)
                        .unwrap(),
                )
                .unwrap(),
            },
            mac_salt: OctetString::new(&SALT[..8]).unwrap(),
            iterations: 2048,
        });

        Pfx {
            version: Version::V3,
            auth_safe: ContentInfo {
                content_type: oid::DATA,
                content: Any::encode_from(&OctetString::new(auth_safe).unwrap()).unwrap(),
            },
            mac_data,
        }
        .to_der()
        .unwrap()
    }
}
