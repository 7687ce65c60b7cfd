use super::BundleArgs;
use crate::{
    signature::{verify::public_key_pem, Signer},
    utils::writer::write_atomic,
};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// Write the key to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

pub(crate) fn run(options: Options) -> anyhow::Result<()> {
    let config = options.bundle.into_config()?;
    let pem = public_key_pem(&Signer::from_config(&config)?.public_key())?;

    match options.output {
        Some(output) => {
            write_atomic(&output, pem.as_bytes())?;
            log::info!("Public key written to: {}", output.display());
        }
        None => print!("{pem}"),
    }

    Ok(())
}
