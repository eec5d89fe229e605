//! Error types for airdrop tree generation

use thiserror::Error;

use crate::common::Hash;

/// A single claim field that cannot be packed into a leaf
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Account is not 40 hex characters (with or without `0x`)
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Amount is not a non-negative decimal integer
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Amount does not fit in a uint256
    #[error("amount {input} exceeds the uint256 range")]
    AmountOverflow { input: String },
}

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum AirdropError {
    /// A claim could not be encoded
    #[error("claim {id}: {source}")]
    Encoding {
        id: u64,
        #[source]
        source: EncodingError,
    },

    /// No claims to build a tree from
    #[error("cannot build a Merkle tree from zero claims")]
    EmptyInput,

    /// Leaf is not part of the tree's bottom level
    #[error("leaf 0x{} is not in the tree", hex::encode(.0))]
    LeafNotFound(Hash),

    /// Two claims share an account
    #[error(
        "duplicate claim for account 0x{}: ids {first_id} and {second_id}",
        hex::encode(.account)
    )]
    DuplicateClaim {
        account: [u8; 20],
        first_id: u64,
        second_id: u64,
    },

    /// Two claims share an id
    #[error("duplicate claim id {0}")]
    DuplicateId(u64),

    /// A freshly generated proof did not reproduce the root
    #[error("proof for claim {id} does not reproduce the Merkle root")]
    SelfCheckFailed { id: u64 },

    /// Malformed input document
    #[error("invalid input: {0}")]
    Input(String),

    /// Malformed hex in a persisted artifact
    #[error("invalid hex {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for airdrop operations
pub type Result<T> = std::result::Result<T, AirdropError>;
