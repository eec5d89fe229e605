//! The published airdrop document: root plus one entry per account.

use std::collections::BTreeMap;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{hex_encode, parse_address, parse_hash, write_file_atomic, Hash};
use crate::error::{AirdropError, Result};
use crate::leaf::{parse_amount, Claim};
use crate::verify::verify_proof;

/// `merkle.json` as consumed by the claim contract's front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// `0x`-prefixed root
    pub merkle_root: String,
    /// Entries keyed by lower-case `0x` account
    pub claims: BTreeMap<String, ClaimEntry>,
}

/// What one account needs to claim on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub id: u64,
    /// Decimal string, since amounts routinely exceed 2^53
    pub amount: String,
    pub proof: Vec<String>,
}

/// A re-derived claim together with its checked proof.
#[derive(Debug, Clone)]
pub struct CheckedClaim {
    pub claim: Claim,
    pub leaf: Hash,
    pub proof: Vec<Hash>,
    pub valid: bool,
}

impl Artifact {
    pub fn new(root: Hash) -> Self {
        Self {
            merkle_root: hex_encode(root),
            claims: BTreeMap::new(),
        }
    }

    /// Records the entry for `claim`.
    pub fn insert(&mut self, claim: &Claim, proof: &[Hash]) {
        self.claims.insert(
            claim.account_hex(),
            ClaimEntry {
                id: claim.id,
                amount: claim.amount.to_string(),
                proof: proof.iter().map(hex_encode).collect(),
            },
        );
    }

    pub fn root(&self) -> Result<Hash> {
        parse_hash(&self.merkle_root)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Sum of all claimed amounts.
    pub fn total_amount(&self) -> Result<BigUint> {
        self.claims.values().try_fold(BigUint::default(), |total, entry| {
            let amount = parse_amount(&entry.amount).map_err(|source| AirdropError::Encoding {
                id: entry.id,
                source,
            })?;
            Ok(total + amount)
        })
    }

    /// Looks up `account` and checks its proof against `root`.
    ///
    /// The leaf is re-derived from the stored `(id, account, amount)`, so this
    /// catches a tampered entry as well as a tampered proof.
    pub fn check_claim_against(&self, account: &str, root: &Hash) -> Result<CheckedClaim> {
        let address = parse_address(account).map_err(|e| AirdropError::Input(e.to_string()))?;
        let key = hex_encode(address);
        let entry = self
            .claims
            .get(&key)
            .ok_or_else(|| AirdropError::Input(format!("account {key} has no claim")))?;
        check_entry(&key, entry, root)
    }

    /// Same as [`Artifact::check_claim_against`] using the document's own root.
    pub fn check_claim(&self, account: &str) -> Result<CheckedClaim> {
        self.check_claim_against(account, &self.root()?)
    }

    /// Checks every entry against `root`, in account order.
    pub fn check_all_against(&self, root: &Hash) -> Result<Vec<CheckedClaim>> {
        self.claims
            .iter()
            .map(|(account, entry)| check_entry(account, entry, root))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the document, replacing `path` only once fully written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_file_atomic(path, &self.to_json()?)?;
        info!(path = %path.display(), claims = self.len(), "saved airdrop tree");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn check_entry(account: &str, entry: &ClaimEntry, root: &Hash) -> Result<CheckedClaim> {
    let claim = Claim::parse(entry.id, account, &entry.amount).map_err(|source| {
        AirdropError::Encoding {
            id: entry.id,
            source,
        }
    })?;
    let leaf = claim.leaf().map_err(|source| AirdropError::Encoding {
        id: entry.id,
        source,
    })?;
    let proof = entry
        .proof
        .iter()
        .map(|hash| parse_hash(hash))
        .collect::<Result<Vec<_>>>()?;
    let valid = verify_proof(&leaf, &proof, root);
    Ok(CheckedClaim {
        claim,
        leaf,
        proof,
        valid,
    })
}
