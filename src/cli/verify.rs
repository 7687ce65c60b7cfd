use crate::signature::{signature_path, verify::Verifier};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// The file to verify
    pub input: PathBuf,

    /// The PEM encoded public key
    #[arg(long)]
    pub public_key: PathBuf,

    /// The signature file, defaults to the one next to the input
    #[arg(long)]
    pub signature: Option<PathBuf>,
}

pub(crate) fn run(options: Options) -> anyhow::Result<()> {
    let signature = options
        .signature
        .unwrap_or_else(|| signature_path(&options.input));

    log::info!("Verifying: {}", options.input.display());
    log::debug!("Signature: {}", signature.display());

    Verifier::from_pem_file(&options.public_key)?.verify_file(&options.input, &signature)?;

    log::info!("Signature is valid");

    Ok(())
}
