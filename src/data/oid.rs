//! Object identifiers used by PKCS#12 bundles

use der::oid::ObjectIdentifier;

pub use const_oid::db::rfc5911::{ID_DATA as DATA, ID_ENCRYPTED_DATA as ENCRYPTED_DATA};
pub use const_oid::db::rfc5912::{
    ID_SHA_1 as SHA1, ID_SHA_256 as SHA256, ID_SHA_384 as SHA384, ID_SHA_512 as SHA512,
};
pub use pkcs12::{
    PKCS_12_CERT_BAG_OID as CERT_BAG, PKCS_12_KEY_BAG_OID as KEY_BAG,
    PKCS_12_PBEWITH_SHAAND40_BIT_RC2_CBC as PBE_SHA1_RC2_40,
    PKCS_12_PBE_WITH_SHAAND3_KEY_TRIPLE_DES_CBC as PBE_SHA1_3DES,
    PKCS_12_PKCS8_KEY_BAG_OID as PKCS8_SHROUDED_KEY_BAG, PKCS_12_X509_CERT_OID as X509_CERTIFICATE,
};
pub use pkcs8::pkcs5::pbes2::PBES2_OID as PBES2;

/// PKCS#9 `friendlyName`
pub const FRIENDLY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.20");
/// PKCS#9 `localKeyId`
pub const LOCAL_KEY_ID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.21");
