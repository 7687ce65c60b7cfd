//! Data structures
//!
//! The PKCS#12 (RFC 7292) ASN.1 model comes from the `pkcs12` and `cms` crates. This adds what is
//! needed on top of it to find the signing key among the bags of a bundle.

use der::{
    asn1::{Any, ContextSpecific, OctetString},
    oid::ObjectIdentifier,
    Decode, Tag, Tagged,
};
use pkcs12::{cert_type::CertBag, safe_bag::SafeBag};
use std::fmt::{Display, Formatter};

mod config;
pub mod oid;

pub use config::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BagKind {
    PrivateKey,
    ShroudedPrivateKey,
    Certificate,
    Other,
}

impl BagKind {
    pub fn is_key(&self) -> bool {
        matches!(self, Self::PrivateKey | Self::ShroudedPrivateKey)
    }
}

impl Display for BagKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateKey => f.write_str("private key"),
            Self::ShroudedPrivateKey => f.write_str("shrouded private key"),
            Self::Certificate => f.write_str("certificate"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Access to the content of a decoded [`SafeBag`]
///
/// ## Encoding
///
/// ```text
/// SafeBag ::= SEQUENCE {
///   bagId          BAG-TYPE.&id ({PKCS12BagSet})
///   bagValue       [0] EXPLICIT BAG-TYPE.&Type({PKCS12BagSet}{@bagId}),
///   bagAttributes  SET OF PKCS12Attribute OPTIONAL
/// }
/// ```
///
/// A decoded bag keeps `bagValue` including its `[0]` wrapper, see [`SafeBagExt::value`].
pub trait SafeBagExt {
    fn kind(&self) -> BagKind;

    /// The bag value, unwrapped from its explicit tag.
    fn value(&self) -> der::Result<Any>;

    fn local_key_id(&self) -> Option<LocalKeyId>;

    fn friendly_name(&self) -> Option<String>;

    /// DER encoded X.509 certificate, if this is a certificate bag
    fn certificate(&self) -> Option<Vec<u8>>;
}

impl SafeBagExt for SafeBag {
    fn kind(&self) -> BagKind {
        if self.bag_id == oid::KEY_BAG {
            BagKind::PrivateKey
        } else if self.bag_id == oid::PKCS8_SHROUDED_KEY_BAG {
            BagKind::ShroudedPrivateKey
        } else if self.bag_id == oid::CERT_BAG {
            BagKind::Certificate
        } else {
            BagKind::Other
        }
    }

    fn value(&self) -> der::Result<Any> {
        Ok(ContextSpecific::<Any>::from_der(&self.bag_value)?.value)
    }

    fn local_key_id(&self) -> Option<LocalKeyId> {
        let value = attribute(self, oid::LOCAL_KEY_ID)?;
        let value = value.decode_as::<OctetString>().ok()?;
        Some(LocalKeyId::new(value.as_bytes()))
    }

    fn friendly_name(&self) -> Option<String> {
        let value = attribute(self, oid::FRIENDLY_NAME)?;
        match value.tag() {
            Tag::BmpString => {
                let data = value.value();
                if data.len() % 2 != 0 {
                    return None;
                }
                let units = data
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]));
                char::decode_utf16(units).collect::<Result<String, _>>().ok()
            }
            Tag::Utf8String => String::from_utf8(value.value().to_vec()).ok(),
            _ => None,
        }
    }

    fn certificate(&self) -> Option<Vec<u8>> {
        if self.kind() != BagKind::Certificate {
            return None;
        }
        let bag = self.value().ok()?.decode_as::<CertBag>().ok()?;
        (bag.cert_id == oid::X509_CERTIFICATE).then(|| bag.cert_value.as_bytes().to_vec())
    }
}

/// The first value of the attribute with the given type
fn attribute(bag: &SafeBag, r#type: ObjectIdentifier) -> Option<&Any> {
    bag.bag_attributes
        .as_ref()?
        .iter()
        .find(|attr| attr.oid == r#type)
        .and_then(|attr| attr.values.get(0))
}
