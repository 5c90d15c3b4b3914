//! Validated primitive types for domain entities.
//!
//! These newtypes provide:
//! - Type safety (can't accidentally pass an amount as an address)
//! - Validation at construction time
//! - Wire-safe serialization (hex strings for addresses/hashes, decimal
//!   strings for integers that may exceed 64 bits, per the envelope wire
//!   format).

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated 20-byte Ethereum address.
///
/// This newtype ensures addresses are always exactly 20 bytes. Use `Address`
/// from `alloy-primitives` for on-chain interaction, but this type at
/// envelope/decoder boundaries and for persistence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    /// Create from a fixed-size array (infallible).
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Try to create from a byte slice.
    ///
    /// # Errors
    /// Returns `InvalidAddress::WrongLength` if the slice is not exactly 20 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, InvalidAddress> {
        let bytes: [u8; 20] = slice
            .try_into()
            .map_err(|_| InvalidAddress::WrongLength(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Extract an address from the low 20 bytes of a 32-byte topic, per the
    /// decoder rule for indexed address parameters.
    #[must_use]
    pub fn from_topic(topic: &B256) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&topic.0[12..32]);
        Self(bytes)
    }

    /// Parse from hex string (with or without 0x prefix).
    ///
    /// # Errors
    /// Returns `InvalidAddress` if the string is not valid hex or wrong length.
    pub fn from_hex(s: &str) -> Result<Self, InvalidAddress> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 40 {
            return Err(InvalidAddress::WrongLength(s.len() / 2));
        }
        let bytes = hex::decode(s).map_err(|_| InvalidAddress::InvalidHex)?;
        Self::from_slice(&bytes)
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to lowercase hex string with 0x prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Check if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({})", self.to_hex())
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<EthAddress> for String {
    fn from(addr: EthAddress) -> Self {
        addr.to_hex()
    }
}

impl TryFrom<String> for EthAddress {
    type Error = InvalidAddress;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl TryFrom<&str> for EthAddress {
    type Error = InvalidAddress;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for EthAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

impl From<Address> for EthAddress {
    fn from(addr: Address) -> Self {
        Self::new(addr.0.0)
    }
}

impl From<EthAddress> for Address {
    fn from(addr: EthAddress) -> Self {
        Self::from(addr.0)
    }
}

/// Error for invalid Ethereum addresses.
#[derive(Debug, Clone, Error)]
pub enum InvalidAddress {
    /// Address has wrong byte length.
    #[error("wrong length: expected 20 bytes, got {0}")]
    WrongLength(usize),
    /// Address contains invalid hex characters.
    #[error("invalid hex encoding")]
    InvalidHex,
}

// ═══════════════════════════════════════════════════════════════════════════════
// 32-BYTE HASH
// ═══════════════════════════════════════════════════════════════════════════════

/// A 32-byte hash: block hash, transaction hash, event signature hash,
/// `orderHash`, `conditionId`, `questionId`, `parentCollectionId`, etc. Every
/// one of these is structurally a 32-byte word on the wire; the newtype keeps
/// them from being interchanged with each other by accident.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash32([u8; 32]);

impl Hash32 {
    /// The zero hash — used as the checkpoint's initial `lastBlockHash`.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create from a fixed-size array (infallible).
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Try to create from a byte slice.
    ///
    /// # Errors
    /// Returns `InvalidHash::WrongLength` if the slice is not exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, InvalidHash> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| InvalidHash::WrongLength(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Parse from hex string (with or without 0x prefix).
    ///
    /// # Errors
    /// Returns `InvalidHash` if the string is not valid hex or wrong length.
    pub fn from_hex(s: &str) -> Result<Self, InvalidHash> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(InvalidHash::WrongLength(s.len() / 2));
        }
        let bytes = hex::decode(s).map_err(|_| InvalidHash::InvalidHex)?;
        Self::from_slice(&bytes)
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string with 0x prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Whether this is the zero hash.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Hash32> for String {
    fn from(hash: Hash32) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for Hash32 {
    type Error = InvalidHash;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<B256> for Hash32 {
    fn from(hash: B256) -> Self {
        Self::new(hash.0)
    }
}

impl From<Hash32> for B256 {
    fn from(hash: Hash32) -> Self {
        Self::from(hash.0)
    }
}

/// Error for invalid 32-byte hashes.
#[derive(Debug, Clone, Error)]
pub enum InvalidHash {
    /// Hash has wrong byte length.
    #[error("wrong length: expected 32 bytes, got {0}")]
    WrongLength(usize),
    /// Hash contains invalid hex characters.
    #[error("invalid hex encoding")]
    InvalidHex,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNT (arbitrary-precision non-negative integer)
// ═══════════════════════════════════════════════════════════════════════════════

/// An arbitrary-precision non-negative integer: token amounts, asset ids,
/// payout numerators, and anything else that arrives ABI-encoded as
/// `uint256`.
///
/// Backed by `U256` (every value this indexer decodes is bounded by the EVM
/// word size). Serializes as a decimal string so JSON consumers don't lose
/// precision the way they would with a bare number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(U256);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a `U256` value (infallible — `U256` is already non-negative).
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Parse from a decimal string.
    ///
    /// # Errors
    /// Returns `InvalidAmount::ParseError` if the string is not a valid
    /// non-negative decimal integer.
    pub fn parse(s: &str) -> Result<Self, InvalidAmount> {
        U256::from_str(s)
            .map(Self)
            .map_err(|_| InvalidAmount::ParseError)
    }

    /// Get the underlying `U256`.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Whether this is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = InvalidAmount;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Error for invalid amounts.
#[derive(Debug, Clone, Error)]
pub enum InvalidAmount {
    /// Failed to parse amount string as a non-negative integer.
    #[error("failed to parse amount as a non-negative integer")]
    ParseError,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK NUMBER (for type clarity)
// ═══════════════════════════════════════════════════════════════════════════════

/// Block number newtype for clarity in function signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockNumber(u64);

impl BlockNumber {
    /// Create a new block number.
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Get the value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the next block number (saturating at `u64::MAX`).
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the previous block number (saturating at 0).
    #[must_use]
    pub const fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Saturating subtraction by a plain block count (used for confirmations
    /// rewinds).
    #[must_use]
    pub const fn saturating_sub(&self, n: u64) -> Self {
        Self(self.0.saturating_sub(n))
    }
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<BlockNumber> for u64 {
    fn from(b: BlockNumber) -> Self {
        b.0
    }
}

impl From<BlockNumber> for i64 {
    #[allow(clippy::cast_possible_wrap)]
    fn from(b: BlockNumber) -> Self {
        b.0 as Self
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod eth_address_tests {
        use super::*;

        #[test]
        fn from_hex_with_prefix() {
            let addr = EthAddress::from_hex("0x1234567890123456789012345678901234567890").unwrap();
            assert_eq!(addr.to_hex(), "0x1234567890123456789012345678901234567890");
        }

        #[test]
        fn from_hex_without_prefix() {
            let addr = EthAddress::from_hex("1234567890123456789012345678901234567890").unwrap();
            assert_eq!(addr.to_hex(), "0x1234567890123456789012345678901234567890");
        }

        #[test]
        fn from_hex_wrong_length() {
            assert!(EthAddress::from_hex("0x1234").is_err());
        }

        #[test]
        fn from_hex_invalid_chars() {
            assert!(EthAddress::from_hex("0xgggggggggggggggggggggggggggggggggggggggg").is_err());
        }

        #[test]
        fn zero_address() {
            assert!(EthAddress::ZERO.is_zero());
        }

        #[test]
        fn from_topic_takes_low_20_bytes() {
            let mut topic = [0u8; 32];
            topic[12..32].copy_from_slice(&[0xAB; 20]);
            let addr = EthAddress::from_topic(&B256::from(topic));
            assert_eq!(addr.as_bytes(), &[0xAB; 20]);
        }

        #[test]
        fn alloy_address_roundtrip() {
            let addr_hex = "0x1234567890123456789012345678901234567890";
            let eth_addr = EthAddress::from_hex(addr_hex).unwrap();
            let alloy_addr: Address = eth_addr.into();
            let back: EthAddress = alloy_addr.into();
            assert_eq!(eth_addr, back);
        }
    }

    mod hash32_tests {
        use super::*;

        #[test]
        fn zero_is_zero() {
            assert!(Hash32::ZERO.is_zero());
        }

        #[test]
        fn from_hex_roundtrip() {
            let mut bytes = [0x11u8; 32];
            bytes[31] = 0xef;
            let hex = format!("0x{}", hex::encode(bytes));
            let hash = Hash32::from_hex(&hex).unwrap();
            assert_eq!(hash.to_hex(), hex);
        }

        #[test]
        fn wrong_length_fails() {
            assert!(Hash32::from_hex("0x1234").is_err());
        }

        #[test]
        fn b256_roundtrip() {
            let b = B256::repeat_byte(0x42);
            let hash: Hash32 = b.into();
            let back: B256 = hash.into();
            assert_eq!(b, back);
        }
    }

    mod amount_tests {
        use super::*;

        #[test]
        fn zero_is_zero() {
            assert!(Amount::ZERO.is_zero());
        }

        #[test]
        fn parse_integer() {
            let amount = Amount::parse("1000").unwrap();
            assert_eq!(amount.to_string(), "1000");
        }

        #[test]
        fn parse_negative_fails() {
            assert!(Amount::parse("-100").is_err());
        }

        #[test]
        fn parse_large_value_preserves_precision() {
            let huge = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
            let amount = Amount::parse(huge).unwrap();
            assert_eq!(amount.to_string(), huge);
        }

        #[test]
        fn serde_roundtrip_as_decimal_string() {
            let amount = Amount::parse("42").unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(json, "\"42\"");
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(amount, back);
        }
    }

    mod block_number_tests {
        use super::*;

        #[test]
        fn new_and_get() {
            let block = BlockNumber::new(12345);
            assert_eq!(block.get(), 12345);
        }

        #[test]
        fn next() {
            let block = BlockNumber::new(100);
            assert_eq!(block.next().get(), 101);
        }

        #[test]
        fn prev() {
            let block = BlockNumber::new(100);
            assert_eq!(block.prev().get(), 99);
        }

        #[test]
        fn prev_saturates_at_zero() {
            let block = BlockNumber::new(0);
            assert_eq!(block.prev().get(), 0);
        }

        #[test]
        fn saturating_sub_confirmations() {
            let block = BlockNumber::new(50);
            assert_eq!(block.saturating_sub(100).get(), 0);
        }

        #[test]
        fn from_u64() {
            let block: BlockNumber = 42_u64.into();
            assert_eq!(block.get(), 42);
        }
    }
}
