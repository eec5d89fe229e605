//! Claim records and their packed keccak256 leaves.
//!
//! A leaf is `keccak256(uint256(id) || address(account) || uint256(amount))`
//! with Solidity `abi.encodePacked` layout: 32 + 20 + 32 = 84 bytes, no
//! padding between fields.

use num_bigint::BigUint;
use num_traits::Num;

use crate::common::{hex_encode, keccak256, parse_address, Hash};
use crate::error::EncodingError;

/// Length of the packed `(uint256, address, uint256)` encoding.
pub const PACKED_LEN: usize = 32 + 20 + 32;

/// An airdrop entitlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Position of the claim in the input (0-based)
    pub id: u64,
    /// Recipient address
    pub account: [u8; 20],
    /// Token amount in base units
    pub amount: BigUint,
}

impl Claim {
    pub fn new(id: u64, account: [u8; 20], amount: impl Into<BigUint>) -> Self {
        Self {
            id,
            account,
            amount: amount.into(),
        }
    }

    /// Builds a claim from the textual account and balance fields of a row.
    pub fn parse(id: u64, account: &str, amount: &str) -> Result<Self, EncodingError> {
        Ok(Self {
            id,
            account: parse_address(account)?,
            amount: parse_amount(amount)?,
        })
    }

    /// Lower-case `0x` account string used as the output key.
    pub fn account_hex(&self) -> String {
        hex_encode(self.account)
    }

    /// Tightly packed `uint256 || address || uint256` bytes.
    pub fn packed(&self) -> Result<[u8; PACKED_LEN], EncodingError> {
        let amount = uint256_be(&self.amount)?;
        let mut out = [0u8; PACKED_LEN];
        out[24..32].copy_from_slice(&self.id.to_be_bytes());
        out[32..52].copy_from_slice(&self.account);
        out[52..].copy_from_slice(&amount);
        Ok(out)
    }

    /// The claim's leaf hash.
    pub fn leaf(&self) -> Result<Hash, EncodingError> {
        encode_leaf(self)
    }
}

/// Hashes the packed encoding of `claim` into its leaf.
pub fn encode_leaf(claim: &Claim) -> Result<Hash, EncodingError> {
    Ok(keccak256(&claim.packed()?))
}

/// Parses a balance column value into an integer amount.
///
/// Thousands separators (`,`) are dropped. Anything other than a plain run of
/// decimal digits is rejected, as is a value above `2^256 - 1`.
pub fn parse_amount(text: &str) -> Result<BigUint, EncodingError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(EncodingError::InvalidAmount {
            input: text.to_string(),
            reason: "empty".to_string(),
        });
    }
    if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_digit()) {
        return Err(EncodingError::InvalidAmount {
            input: text.to_string(),
            reason: format!("unexpected character {bad:?}"),
        });
    }
    let amount =
        BigUint::from_str_radix(&cleaned, 10).map_err(|e| EncodingError::InvalidAmount {
            input: text.to_string(),
            reason: e.to_string(),
        })?;
    if amount.bits() > 256 {
        return Err(EncodingError::AmountOverflow { input: cleaned });
    }
    Ok(amount)
}

fn uint256_be(value: &BigUint) -> Result<[u8; 32], EncodingError> {
    if value.bits() > 256 {
        return Err(EncodingError::AmountOverflow {
            input: value.to_string(),
        });
    }
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> [u8; 20] {
        [byte; 20]
    }

    #[test]
    fn test_packed_layout() {
        let claim = Claim::new(1, addr(0xaa), 258u32);
        let packed = claim.packed().unwrap();
        assert_eq!(packed.len(), 84);
        assert_eq!(packed[..31], [0u8; 31]);
        assert_eq!(packed[31], 1);
        assert_eq!(packed[32..52], [0xaa; 20]);
        assert_eq!(packed[52..82], [0u8; 30]);
        assert_eq!(packed[82..], [0x01, 0x02]);
    }

    #[test]
    fn test_leaf_vectors() {
        // keccak256(abi.encodePacked(uint256 id, address account, uint256 amount))
        let l0 = Claim::new(0, addr(0xaa), 100u32).leaf().unwrap();
        let l1 = Claim::new(1, addr(0xbb), 200u32).leaf().unwrap();
        assert_eq!(
            hex::encode(l0),
            "831b128d2fddcbfe7f9bc1b682f908ee800b9373b18ee4ae4f9fb00838447e3e"
        );
        assert_eq!(
            hex::encode(l1),
            "0aa899fc3c90ed128f835896593f1f03924419299f1b582dba5f6e038071032e"
        );
    }

    #[test]
    fn test_leaf_changes_with_each_field() {
        let base = Claim::new(5, addr(0x11), 1000u32);
        let leaf = base.leaf().unwrap();

        let mut other = base.clone();
        other.id = 6;
        assert_ne!(other.leaf().unwrap(), leaf);

        let mut other = base.clone();
        other.account[19] ^= 1;
        assert_ne!(other.leaf().unwrap(), leaf);

        let mut other = base.clone();
        other.amount += 1u32;
        assert_ne!(other.leaf().unwrap(), leaf);
    }

    #[test]
    fn test_parse_claim_normalizes_case() {
        let a = Claim::parse(0, "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "100").unwrap();
        let b = Claim::parse(0, "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "100").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.account_hex(), format!("0x{}", "aa".repeat(20)));
    }

    #[test]
    fn test_parse_amount_strips_separators() {
        assert_eq!(parse_amount("1,234,567").unwrap(), BigUint::from(1_234_567u32));
        assert_eq!(parse_amount("  42 ").unwrap(), BigUint::from(42u32));
        assert_eq!(parse_amount("0").unwrap(), BigUint::from(0u32));
    }

    #[test]
    fn test_parse_amount_rejects_non_integers() {
        for bad in ["", ",", "-5", "+5", "1.5", "1e18", "abc", "12 34"] {
            assert!(
                matches!(parse_amount(bad), Err(EncodingError::InvalidAmount { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_amount_uint256_bound() {
        let max = (BigUint::from(1u32) << 256usize) - 1u32;
        assert_eq!(parse_amount(&max.to_string()).unwrap(), max);

        let over = max + 1u32;
        assert!(matches!(
            parse_amount(&over.to_string()),
            Err(EncodingError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_encode_leaf_rejects_oversized_amount() {
        let claim = Claim::new(0, addr(1), BigUint::from(1u32) << 256usize);
        assert!(matches!(
            encode_leaf(&claim),
            Err(EncodingError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_max_amount_packs_to_all_ones() {
        let max = (BigUint::from(1u32) << 256usize) - 1u32;
        let packed = Claim::new(0, addr(1), max).packed().unwrap();
        assert_eq!(packed[52..], [0xff; 32]);
    }
}
