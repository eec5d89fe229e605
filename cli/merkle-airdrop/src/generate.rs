//! One generation run: claims in, root and per-account proofs out.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::artifact::Artifact;
use crate::common::{hex_encode, Hash};
use crate::error::{AirdropError, Result};
use crate::ingest::RawRecord;
use crate::leaf::{encode_leaf, Claim};
use crate::tree::MerkleTree;
use crate::verify::verify_proof;

/// A claim with its leaf and sibling path.
#[derive(Debug, Clone)]
pub struct ClaimProof {
    pub claim: Claim,
    pub leaf: Hash,
    pub proof: Vec<Hash>,
}

/// Everything a generation run produces.
#[derive(Debug, Clone)]
pub struct Airdrop {
    pub tree: MerkleTree,
    /// In ascending id order
    pub proofs: Vec<ClaimProof>,
}

impl Airdrop {
    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    /// The publishable document.
    pub fn to_artifact(&self) -> Artifact {
        let mut artifact = Artifact::new(self.root());
        for entry in &self.proofs {
            artifact.insert(&entry.claim, &entry.proof);
        }
        artifact
    }
}

/// Turns input rows into claims, numbering them by row.
pub fn claims_from_records(records: &[RawRecord]) -> Result<Vec<Claim>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let id = index as u64;
            Claim::parse(id, &record.account, &record.balance)
                .map_err(|source| AirdropError::Encoding { id, source })
        })
        .collect()
}

/// Builds the tree over `claims` and a checked proof for every claim.
///
/// Claims may arrive in any order; leaves are laid out by ascending id.
pub fn generate(mut claims: Vec<Claim>) -> Result<Airdrop> {
    if claims.is_empty() {
        return Err(AirdropError::EmptyInput);
    }
    claims.sort_by_key(|claim| claim.id);
    check_unique(&claims)?;

    let leaves = claims
        .par_iter()
        .map(|claim| {
            encode_leaf(claim).map_err(|source| AirdropError::Encoding {
                id: claim.id,
                source,
            })
        })
        .collect::<Result<Vec<Hash>>>()?;
    debug!(leaves = leaves.len(), "hashed claim leaves");

    let tree = MerkleTree::build(leaves.clone())?;
    let root = tree.root();
    info!(
        claims = claims.len(),
        depth = tree.depth(),
        root = %hex_encode(root),
        "built airdrop tree"
    );

    let proofs = claims
        .into_par_iter()
        .zip(leaves.into_par_iter())
        .map(|(claim, leaf)| {
            let proof = tree.proof_for(&leaf)?;
            if !verify_proof(&leaf, &proof, &root) {
                return Err(AirdropError::SelfCheckFailed { id: claim.id });
            }
            trace!(id = claim.id, account = %claim.account_hex(), siblings = proof.len(), "proof");
            Ok(ClaimProof { claim, leaf, proof })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Airdrop { tree, proofs })
}

/// Reads rows, generates, and returns the document to publish.
pub fn generate_artifact(records: &[RawRecord]) -> Result<Artifact> {
    let claims = claims_from_records(records)?;
    Ok(generate(claims)?.to_artifact())
}

/// Expects `claims` sorted by id.
fn check_unique(claims: &[Claim]) -> Result<()> {
    let mut ids = HashSet::with_capacity(claims.len());
    let mut accounts: HashMap<[u8; 20], u64> = HashMap::with_capacity(claims.len());
    for claim in claims {
        if !ids.insert(claim.id) {
            return Err(AirdropError::DuplicateId(claim.id));
        }
        if let Some(&first_id) = accounts.get(&claim.account) {
            return Err(AirdropError::DuplicateClaim {
                account: claim.account,
                first_id,
                second_id: claim.id,
            });
        }
        accounts.insert(claim.account, claim.id);
    }
    Ok(())
}
