use super::BundleArgs;
use crate::signature::sign;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// The file to sign
    pub input: PathBuf,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

pub(crate) fn run(options: Options) -> anyhow::Result<()> {
    let config = options.bundle.into_config()?;
    log::debug!("Configuration: {config:?}");

    sign(&options.input, &config)?;

    Ok(())
}
