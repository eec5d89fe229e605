use sha3::{Digest, Keccak256};
use std::io::Write;
use std::path::Path;

use crate::error::{AirdropError, EncodingError, Result};

/// A 32-byte keccak256 digest: leaves, internal nodes and the root.
pub type Hash = [u8; 32];

/// Computes the keccak256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Computes a Keccak256 hash of two 32-byte values concatenated.
///
/// # Arguments
/// * `left` - First 32-byte value
/// * `right` - Second 32-byte value
///
/// # Returns
/// 32-byte hash result
pub fn keccak256_hash(left: &Hash, right: &Hash) -> Hash {
    let hash = Keccak256::new()
        .chain_update(left)
        .chain_update(right)
        .finalize();
    hash.into()
}

/// Hashes a sibling pair after ordering it byte-lexicographically.
///
/// Both the tree builder and the verifier go through this function, so a
/// proof never needs to carry left/right positions.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        keccak256_hash(a, b)
    } else {
        keccak256_hash(b, a)
    }
}

/// Parses an Ethereum address from a hex string.
///
/// # Arguments
/// * `addr_str` - The address string, with or without "0x" prefix, any case
///
/// # Returns
/// A 20-byte array representing the address
///
/// # Errors
/// Returns an error if the address is not 40 hex characters or contains invalid hex
pub fn parse_address(addr_str: &str) -> std::result::Result<[u8; 20], EncodingError> {
    let trimmed = addr_str.trim();
    let cleaned = strip_hex_prefix(trimmed);
    if cleaned.len() != 40 {
        return Err(EncodingError::InvalidAddress {
            input: addr_str.to_string(),
            reason: format!("expected 40 hex chars, got {}", cleaned.len()),
        });
    }
    let mut address = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut address).map_err(|e| EncodingError::InvalidAddress {
        input: addr_str.to_string(),
        reason: e.to_string(),
    })?;
    Ok(address)
}

/// Parses a 32-byte hash from hex, with or without "0x".
pub fn parse_hash(hash_str: &str) -> Result<Hash> {
    let cleaned = strip_hex_prefix(hash_str.trim());
    let mut hash = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut hash).map_err(|e| AirdropError::InvalidHex {
        input: hash_str.to_string(),
        reason: e.to_string(),
    })?;
    Ok(hash)
}

/// Lower-case hex with a `0x` prefix.
pub fn hex_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Writes `contents` to a temp file beside `path` and renames it into place.
///
/// Readers of `path` see either the previous file or the complete new one. The
/// temp file is removed if any step fails.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
