//! Sorted-pair keccak Merkle tree stored as a flat level table.
//!
//! `levels[0]` holds the leaves in claim-id order and the last level holds the
//! root alone. Parents are `keccak256(min(a, b) || max(a, b))`. A node left
//! without a partner at the end of an odd-length level moves up unchanged; it
//! is never paired with a copy of itself.

use std::collections::HashMap;

use tracing::debug;

use crate::common::{hash_sorted_pair, Hash};
use crate::error::{AirdropError, Result};

/// A binary Merkle tree built once from a fixed leaf sequence.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// All nodes stored level by level, bottom-up.
    levels: Vec<Vec<Hash>>,
    /// First position of every leaf in `levels[0]`.
    positions: HashMap<Hash, usize>,
}

impl MerkleTree {
    /// Builds the tree bottom-up from leaves already in canonical order.
    pub fn build(leaves: Vec<Hash>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(AirdropError::EmptyInput);
        }

        let mut positions = HashMap::with_capacity(leaves.len());
        for (index, leaf) in leaves.iter().enumerate() {
            positions.entry(*leaf).or_insert(index);
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let level = &levels[levels.len() - 1];
            let next_level: Vec<Hash> = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_sorted_pair(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next_level);
        }

        debug!(
            leaves = levels[0].len(),
            depth = levels.len() - 1,
            "built merkle tree"
        );

        Ok(Self { levels, positions })
    }

    /// The root hash.
    pub fn root(&self) -> Hash {
        // `build` never produces an empty level table or an empty level.
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels above the leaves; zero for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// All levels, leaves first, root last.
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    /// Position of `leaf` in the bottom level.
    pub fn position(&self, leaf: &Hash) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    /// Sibling path for `leaf`, bottom-up.
    pub fn proof_for(&self, leaf: &Hash) -> Result<Vec<Hash>> {
        let index = self
            .position(leaf)
            .ok_or(AirdropError::LeafNotFound(*leaf))?;
        Ok(self.proof_at(index))
    }

    /// Sibling path for the leaf at `leaf_index`, or `None` if out of range.
    pub fn proof(&self, leaf_index: usize) -> Option<Vec<Hash>> {
        (leaf_index < self.leaf_count()).then(|| self.proof_at(leaf_index))
    }

    fn proof_at(&self, leaf_index: usize) -> Vec<Hash> {
        let mut proof = Vec::with_capacity(self.depth());
        let mut index = leaf_index;

        for level in &self.levels[..self.depth()] {
            let sibling_index = index ^ 1;
            // An unpaired last node has no sibling and contributes nothing.
            if let Some(sibling) = level.get(sibling_index) {
                proof.push(*sibling);
            }
            index /= 2;
        }

        proof
    }
}
