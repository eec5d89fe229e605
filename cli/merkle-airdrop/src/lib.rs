pub mod artifact;
pub mod common;
pub mod error;
pub mod generate;
pub mod ingest;
pub mod leaf;
pub mod logging;
pub mod tree;
pub mod verify;

pub use artifact::{Artifact, CheckedClaim, ClaimEntry};
pub use common::{
    hash_sorted_pair, hex_encode, keccak256, parse_address, parse_hash, write_file_atomic, Hash,
};
pub use error::{AirdropError, EncodingError, Result};
pub use generate::{claims_from_records, generate, generate_artifact, Airdrop, ClaimProof};
pub use ingest::{read_records, read_records_from, Columns, RawRecord};
pub use leaf::{encode_leaf, parse_amount, Claim};
pub use tree::MerkleTree;
pub use verify::{process_proof, verify_proof};
