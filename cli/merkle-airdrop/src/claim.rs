use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use merkle_airdrop::{hex_encode, write_file_atomic, Artifact};

#[derive(Args, Debug)]
pub struct Cli {
    /// Airdrop JSON written by build-tree
    #[arg(short = 't', long, default_value = "merkle.json")]
    tree: PathBuf,

    /// Claiming account (hex, with or without 0x)
    #[arg(short, long)]
    account: String,

    /// Write the claim package here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the distributor's `claim(id, account, amount, proof)`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimOutput {
    merkle_root: String,
    account: String,
    id: u64,
    amount: String,
    leaf: String,
    proof: Vec<String>,
}

pub fn run(args: &Cli) -> Result<()> {
    let artifact = Artifact::load(&args.tree)
        .with_context(|| format!("Failed to load airdrop tree {:?}", args.tree))?;

    let checked = artifact
        .check_claim(&args.account)
        .context("Failed to look up claim")?;
    if !checked.valid {
        anyhow::bail!(
            "Stored proof for {} does not match root {}",
            checked.claim.account_hex(),
            artifact.merkle_root
        );
    }

    let output = ClaimOutput {
        merkle_root: artifact.merkle_root.clone(),
        account: checked.claim.account_hex(),
        id: checked.claim.id,
        amount: checked.claim.amount.to_string(),
        leaf: hex_encode(checked.leaf),
        proof: checked.proof.iter().map(hex_encode).collect(),
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize claim")?;

    match &args.output {
        Some(path) => {
            write_file_atomic(path, &json).context("Failed to write claim file")?;
            println!("Claim for {} written to {:?}", output.account, path);
        }
        None => println!("{json}"),
    }

    Ok(())
}
