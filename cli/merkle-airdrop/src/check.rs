use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, warn};

use merkle_airdrop::{hex_encode, parse_hash, Artifact, CheckedClaim};

#[derive(Args, Debug)]
pub struct Cli {
    /// Airdrop JSON written by build-tree
    #[arg(short = 't', long, default_value = "merkle.json")]
    tree: PathBuf,

    /// Only check this account
    #[arg(short, long)]
    account: Option<String>,

    /// Published root to check against instead of the one in the file
    #[arg(short, long)]
    root: Option<String>,
}

pub fn run(args: &Cli) -> Result<()> {
    let artifact = Artifact::load(&args.tree)
        .with_context(|| format!("Failed to load airdrop tree {:?}", args.tree))?;

    let stored_root = artifact.root().context("Invalid Merkle root in file")?;
    let root = match &args.root {
        Some(root) => parse_hash(root).context("Invalid Merkle root")?,
        None => stored_root,
    };
    if root != stored_root {
        warn!(
            file = %hex_encode(stored_root),
            published = %hex_encode(root),
            "file root differs from published root"
        );
    }

    let checked = match &args.account {
        Some(account) => vec![artifact
            .check_claim_against(account, &root)
            .context("Failed to check claim")?],
        None => artifact
            .check_all_against(&root)
            .context("Failed to check claims")?,
    };

    let failed = report(&checked);
    println!(
        "{} of {} claims verify against {}",
        checked.len() - failed,
        checked.len(),
        hex_encode(root)
    );
    ensure_all_valid(failed)
}

/// Prints each invalid claim and returns how many there were.
fn report(checked: &[CheckedClaim]) -> usize {
    let mut failed = 0usize;
    for entry in checked {
        debug!(
            id = entry.claim.id,
            account = %entry.claim.account_hex(),
            valid = entry.valid,
            "checked claim"
        );
        if !entry.valid {
            failed += 1;
            println!(
                "INVALID: {} (id {})",
                entry.claim.account_hex(),
                entry.claim.id
            );
        }
    }
    failed
}

fn ensure_all_valid(failed: usize) -> Result<()> {
    if failed > 0 {
        anyhow::bail!("{failed} claim(s) failed verification");
    }
    Ok(())
}
