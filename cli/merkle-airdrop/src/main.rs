#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use clap::{ArgAction, Parser, Subcommand};

use merkle_airdrop::logging::{self, LogLevel};

mod build_tree;
mod check;
mod claim;

#[derive(Parser, Debug)]
#[command(name = "merkle-airdrop")]
#[command(about = "Merkle airdrop tree and proof tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the Merkle root and per-account proofs from a holder CSV
    BuildTree(build_tree::Cli),
    /// Print the claim package for one account
    Claim(claim::Cli),
    /// Check stored proofs against a root
    Verify(check::Cli),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::try_init(LogLevel::from_verbosity(cli.verbose)).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::BuildTree(args) => build_tree::run(args)?,
        Commands::Claim(args) => claim::run(&args)?,
        Commands::Verify(args) => check::run(&args)?,
    }

    Ok(())
}
