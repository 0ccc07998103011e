//! Address and object id types.
//!
//! Sui addresses and object ids are both 32-byte values, displayed as
//! 64 hexadecimal characters with a `0x` prefix.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of an address or object id in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// The length of the canonical `0x`-prefixed hex form of an object id.
pub const OBJECT_ID_LITERAL_LENGTH: usize = 2 + ADDRESS_LENGTH * 2;

/// A 32-byte Sui account address.
///
/// Addresses are derived from key material (Blake2b-256 of the signature
/// scheme flag followed by the public key) and are immutable once derived.
///
/// # Display Format
///
/// Addresses are displayed as 64 hexadecimal characters with a `0x` prefix.
/// Short inputs (like `0x2` for the framework) are zero-padded on the left.
///
/// # Example
///
/// ```rust
/// use sui_client_types::SuiAddress;
///
/// let addr = SuiAddress::from_hex("0x2").unwrap();
/// assert_eq!(
///     addr.to_string(),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert_eq!(addr.to_short_string(), "0x2");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

impl SuiAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The Move standard library address (0x1).
    pub const ONE: Self = Self::from_u64(1);

    /// The Sui framework address (0x2).
    pub const TWO: Self = Self::from_u64(2);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a u64 value (for small addresses like 0x2).
    const fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        let value_bytes = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[ADDRESS_LENGTH - 8 + i] = value_bytes[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Creates an address from a hex string (with or without `0x` prefix).
    ///
    /// Short inputs are zero-padded on the left. Empty strings and bare
    /// `0x` prefixes are rejected.
    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> ClientResult<Self> {
        let hex_str = hex_str.as_ref();

        if hex_str.is_empty() {
            return Err(ClientError::InvalidAddress(
                "address cannot be empty".to_string(),
            ));
        }

        let hex_str = if hex_str.starts_with(b"0x") || hex_str.starts_with(b"0X") {
            &hex_str[2..]
        } else {
            hex_str
        };

        let hex_string =
            std::str::from_utf8(hex_str).map_err(|e| ClientError::InvalidAddress(e.to_string()))?;

        if hex_string.is_empty() {
            return Err(ClientError::InvalidAddress(
                "address must contain at least one hex digit".to_string(),
            ));
        }

        if hex_string.len() > ADDRESS_LENGTH * 2 {
            return Err(ClientError::InvalidAddress(format!(
                "address too long: {} characters (max {})",
                hex_string.len(),
                ADDRESS_LENGTH * 2
            )));
        }

        // Zero-pad to full length
        let padded = format!("{:0>64}", hex_string);
        let bytes = hex::decode(&padded)?;

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&bytes);
        Ok(Self(address))
    }

    /// Creates an address from a byte slice.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> ClientResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(ClientError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the address as a hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns a short hex string, trimming leading zeros.
    ///
    /// For example, `0x0000...0002` becomes `0x2`.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl Default for SuiAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_short_string())
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            // BCS serialization: fixed-size array without length prefix
            use serde::ser::SerializeTuple;
            let mut tuple = serializer.serialize_tuple(ADDRESS_LENGTH)?;
            for byte in &self.0 {
                tuple.serialize_element(byte)?;
            }
            tuple.end()
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; ADDRESS_LENGTH]>::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}

impl From<[u8; ADDRESS_LENGTH]> for SuiAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for SuiAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The id of an on-chain object.
///
/// Object ids share the 32-byte layout of addresses but name objects, not
/// accounts. The canonical lexical form is `0x` followed by exactly 64 hex
/// digits; [`ObjectId::is_literal`] recognizes it during argument inference.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId(SuiAddress);

impl ObjectId {
    /// Creates an object id from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(SuiAddress::new(bytes))
    }

    /// Creates an object id from a hex string (with or without `0x` prefix).
    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> ClientResult<Self> {
        SuiAddress::from_hex(hex_str).map(Self)
    }

    /// Returns true if `s` is the canonical object-id lexical form:
    /// `0x` followed by exactly 64 hex digits.
    pub fn is_literal(s: &str) -> bool {
        s.len() == OBJECT_ID_LITERAL_LENGTH
            && s.starts_with("0x")
            && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Returns the id as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the canonical hex form with `0x` prefix.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Returns the underlying address value.
    pub fn into_address(self) -> SuiAddress {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0.to_short_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<SuiAddress> for ObjectId {
    fn from(address: SuiAddress) -> Self {
        Self(address)
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        SuiAddress::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        // Full address
        let addr = SuiAddress::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(addr, SuiAddress::TWO);

        // Short address
        let addr = SuiAddress::from_hex("0x2").unwrap();
        assert_eq!(addr, SuiAddress::TWO);

        // Without prefix
        let addr = SuiAddress::from_hex("2").unwrap();
        assert_eq!(addr, SuiAddress::TWO);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(
            SuiAddress::ONE.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(SuiAddress::ONE.to_short_string(), "0x1");
        assert_eq!(SuiAddress::ZERO.to_short_string(), "0x0");
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(SuiAddress::from_hex("").is_err());
        assert!(SuiAddress::from_hex("0x").is_err());
        assert!(SuiAddress::from_hex("not_hex").is_err());
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(SuiAddress::from_hex(too_long).is_err());
    }

    #[test]
    fn test_json_serialization() {
        let addr = SuiAddress::TWO;
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000002\""
        );

        let parsed: SuiAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_bcs_serialization() {
        // Fixed-size array without length prefix
        let addr = SuiAddress::TWO;
        let bytes = bcs::to_bytes(&addr).unwrap();
        assert_eq!(bytes.len(), ADDRESS_LENGTH);
        assert_eq!(bytes[ADDRESS_LENGTH - 1], 2);

        let decoded: SuiAddress = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_object_id_literal() {
        let literal = format!("0x{}", "ab".repeat(32));
        assert!(ObjectId::is_literal(&literal));

        // Too short, too long, or not hex
        assert!(!ObjectId::is_literal("0xab"));
        assert!(!ObjectId::is_literal(&format!("0x{}", "ab".repeat(33))));
        assert!(!ObjectId::is_literal(&format!("0x{}zz", "ab".repeat(31))));
        assert!(!ObjectId::is_literal("0x2::sui::SUI"));
    }

    #[test]
    fn test_object_id_round_trip() {
        let id = ObjectId::from_hex("0x5").unwrap();
        assert!(ObjectId::is_literal(&id.to_hex()));
        assert_eq!(ObjectId::from_hex(id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_object_id_ordering() {
        let a = ObjectId::from_hex("0x1").unwrap();
        let b = ObjectId::from_hex("0x2").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_from_str() {
        let addr: SuiAddress = "0x2".parse().unwrap();
        assert_eq!(addr, SuiAddress::TWO);
        let id: ObjectId = "0x2".parse().unwrap();
        assert_eq!(id.into_address(), SuiAddress::TWO);
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SuiAddress::ONE);
        set.insert(SuiAddress::TWO);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&SuiAddress::ONE));
    }
}
