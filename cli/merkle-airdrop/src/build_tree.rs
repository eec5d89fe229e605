use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use merkle_airdrop::ingest::{DEFAULT_ADDRESS_COLUMN, DEFAULT_BALANCE_COLUMN};
use merkle_airdrop::{
    claims_from_records, generate, read_records, write_file_atomic, Artifact, Columns,
};

#[derive(Args, Debug)]
pub struct Cli {
    /// Token-holder CSV with a header row
    #[arg(short, long, default_value = "tokenholders.csv")]
    input: PathBuf,

    /// Output JSON with the Merkle root and one proof per account
    #[arg(short, long, default_value = "merkle.json")]
    output: PathBuf,

    /// Header of the holder address column
    #[arg(long, default_value = DEFAULT_ADDRESS_COLUMN)]
    address_column: String,

    /// Header of the balance column
    #[arg(long, default_value = DEFAULT_BALANCE_COLUMN)]
    balance_column: String,

    /// Also write the bare Merkle root to this file
    #[arg(short, long)]
    root_output: Option<PathBuf>,
}

pub fn run(args: Cli) -> Result<()> {
    let columns = Columns {
        address: args.address_column,
        balance: args.balance_column,
    };

    println!("Reading token holders from {:?}...", args.input);
    let records = read_records(&args.input, &columns)
        .with_context(|| format!("Failed to read {:?}", args.input))?;
    info!(rows = records.len(), "loaded token holders");

    let claims = claims_from_records(&records).context("Invalid claim in input")?;

    println!("Building Merkle tree over {} claims...", claims.len());
    let airdrop = generate(claims).context("Failed to build Merkle tree")?;
    let artifact = airdrop.to_artifact();
    let total = artifact
        .total_amount()
        .context("Failed to total claim amounts")?;

    println!("Merkle root: {}", artifact.merkle_root);

    println!("Writing claims to {:?}...", args.output);
    write_outputs(&artifact, &args.output, args.root_output.as_deref())?;

    println!("Claims: {}", artifact.len());
    println!("Total amount: {total}");
    println!("Tree depth: {}", airdrop.tree.depth());
    println!("Done!");
    Ok(())
}

/// Writes the root file (if requested) and then the claims file.
///
/// A failed claims write removes the root file again, so a failed run leaves
/// neither output behind.
fn write_outputs(artifact: &Artifact, output: &Path, root_output: Option<&Path>) -> Result<()> {
    if let Some(root_path) = root_output {
        write_file_atomic(root_path, &format!("{}\n", artifact.merkle_root))
            .context("Failed to write root file")?;
    }

    if let Err(e) = artifact.save(output) {
        if let Some(root_path) = root_output {
            let _ = std::fs::remove_file(root_path);
        }
        return Err(e).context("Failed to write claims file");
    }

    Ok(())
}
