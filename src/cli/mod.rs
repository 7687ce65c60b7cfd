use crate::data::{
    LocalKeyId, SignerConfig, ENV_BUNDLE_PATH, ENV_LOCAL_KEY_ID, ENV_PASSPHRASE, SIGNING_KEY_ID,
};
use std::path::PathBuf;

pub mod digest;
pub mod inspect;
pub mod public_key;
pub mod sign;
pub mod verify;

/// Options locating the signing key
#[derive(clap::Args, Clone, Debug)]
pub struct BundleArgs {
    /// The PKCS#12 bundle holding the signing key
    #[arg(long, env = ENV_BUNDLE_PATH)]
    pub bundle: Option<PathBuf>,

    /// The passphrase of the bundle
    #[arg(long, env = ENV_PASSPHRASE, hide_env_values = true)]
    pub passphrase: Option<String>,

    /// The local key id of the signing key bag, as hex
    #[arg(long, env = ENV_LOCAL_KEY_ID, default_value = SIGNING_KEY_ID)]
    pub local_key_id: LocalKeyId,
}

impl BundleArgs {
    pub fn into_config(self) -> anyhow::Result<SignerConfig> {
        Ok(SignerConfig::new(
            self.bundle,
            self.passphrase,
            self.local_key_id,
        )?)
    }
}
