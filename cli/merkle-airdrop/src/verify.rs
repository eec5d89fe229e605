//! Standalone proof verification.
//!
//! Needs nothing but a leaf, its sibling path and the published root; the
//! fold mirrors what an on-chain `MerkleProof.verify` does with sorted pairs.

use crate::common::{hash_sorted_pair, Hash};

/// Folds `proof` over `leaf` and returns the reconstructed root.
pub fn process_proof(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |current, sibling| hash_sorted_pair(&current, sibling))
}

/// Returns true if `proof` carries `leaf` to `root`.
pub fn verify_proof(leaf: &Hash, proof: &[Hash], root: &Hash) -> bool {
    process_proof(leaf, proof) == *root
}
