use crate::error::Error;
use std::{
    fmt::{Debug, Display, Formatter},
    path::PathBuf,
    str::FromStr,
};

/// Environment variable holding the path of the PKCS#12 bundle
pub const ENV_BUNDLE_PATH: &str = "SIGNING_PFX_PATH";
/// Environment variable holding the passphrase of the bundle
pub const ENV_PASSPHRASE: &str = "SIGNING_PFX_PASSPHRASE";
/// Environment variable overriding [`SIGNING_KEY_ID`]
pub const ENV_LOCAL_KEY_ID: &str = "SIGNING_LOCAL_KEY_ID";

/// The `localKeyId` of the release signing key bag.
///
/// This belongs to the current signing certificate and must be updated when the certificate is
/// renewed. Run `pfxsign inspect` against the new bundle to find the value.
pub const SIGNING_KEY_ID: &str = "7a0c38e5d4b1f96230ae8d174c5b29f0e3d6a18b";

/// The value of a `localKeyId` bag attribute.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LocalKeyId(Vec<u8>);

impl LocalKeyId {
    pub fn new(id: impl AsRef<[u8]>) -> Self {
        Self(id.as_ref().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Default for LocalKeyId {
    fn default() -> Self {
        // the constant is valid hex, checked by the tests
        SIGNING_KEY_ID.parse().unwrap_or_else(|_| Self(Vec::new()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid local key id '{0}', expected hex encoded bytes")]
pub struct ParseLocalKeyIdError(String);

impl FromStr for LocalKeyId {
    type Err = ParseLocalKeyIdError;

    /// Parse hex, allowing `:` and whitespace between the bytes, as tools print it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s
            .chars()
            .filter(|c| *c != ':' && !c.is_whitespace())
            .collect();

        if hex.is_empty() {
            return Err(ParseLocalKeyIdError(s.to_string()));
        }

        base16::decode(&hex)
            .map(Self)
            .map_err(|_| ParseLocalKeyIdError(s.to_string()))
    }
}

impl Display for LocalKeyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&base16::encode_lower(&self.0))
    }
}

impl Debug for LocalKeyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LocalKeyId")
            .field(&base16::encode_lower(&self.0))
            .finish()
    }
}

/// Everything needed to get hold of the signing key.
#[derive(Clone)]
pub struct SignerConfig {
    pub bundle: PathBuf,
    pub passphrase: String,
    pub local_key_id: LocalKeyId,
}

impl SignerConfig {
    /// Create a new configuration, failing if one of the required values is absent or empty.
    pub fn new(
        bundle: Option<PathBuf>,
        passphrase: Option<String>,
        local_key_id: LocalKeyId,
    ) -> Result<Self, Error> {
        let bundle = match bundle {
            Some(bundle) if !bundle.as_os_str().is_empty() => bundle,
            _ => {
                return Err(Error::Configuration(format!(
                    "missing bundle path, set {ENV_BUNDLE_PATH} or use --bundle"
                )))
            }
        };

        let passphrase = match passphrase {
            Some(passphrase) if !passphrase.is_empty() => passphrase,
            _ => {
                return Err(Error::Configuration(format!(
                    "missing bundle passphrase, set {ENV_PASSPHRASE} or use --passphrase"
                )))
            }
        };

        if local_key_id.as_bytes().is_empty() {
            return Err(Error::Configuration("empty local key id".into()));
        }

        Ok(Self {
            bundle,
            passphrase,
            local_key_id,
        })
    }
}

impl Debug for SignerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("bundle", &self.bundle)
            .field("passphrase", &"***")
            .field("local_key_id", &self.local_key_id)
            .finish()
    }
}
