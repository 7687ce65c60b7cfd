use crate::cli::{digest, inspect, public_key, sign, verify};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

mod bundle;
mod cli;
pub(crate) mod data;
pub(crate) mod error;
pub(crate) mod signature;
mod utils;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Don't output anything
    #[arg(global = true, short, long, default_value = "false")]
    quiet: bool,

    /// Increase verbosity level
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign a file, writing the signature to <FILE>-sig.bin
    Sign(sign::Options),
    /// Verify the signature of a file
    Verify(verify::Options),
    /// Create a digest of a file
    Digest(digest::Options),
    /// List the content of the bundle
    Inspect(inspect::Options),
    /// Export the public key of the signing key
    PublicKey(public_key::Options),
}

fn setup_logger(cli: &Cli) -> anyhow::Result<()> {
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Off,
        (_, 0) => LevelFilter::Info,
        (_, 1) => LevelFilter::Debug,
        (_, _) => LevelFilter::Trace,
    };

    TermLogger::init(
        log_level,
        ConfigBuilder::new()
            .set_time_level(LevelFilter::Debug)
            .set_max_level(LevelFilter::Debug)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    log::debug!("Log Level: {log_level}");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(&cli)?;

    match cli.command {
        Command::Sign(options) => sign::run(options)?,
        Command::Verify(options) => verify::run(options)?,
        Command::Digest(options) => digest::run(options)?,
        Command::Inspect(options) => inspect::run(options)?,
        Command::PublicKey(options) => public_key::run(options)?,
    }

    Ok(())
}
