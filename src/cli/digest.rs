use crate::signature::digest::{digest_file, DigestAlgorithm};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// The file to create the digest for
    pub input: PathBuf,

    /// The digest algorithm to use
    #[arg(long, value_enum, default_value_t)]
    pub algorithm: DigestAlgorithm,
}

pub(crate) fn run(options: Options) -> anyhow::Result<()> {
    let digest = digest_file(&options.input, options.algorithm)?;

    println!("{}", base16::encode_lower(&digest));

    Ok(())
}
