//! Call arguments and their wire encoding.
//!
//! A [`CallArg`] is one parameter of a move call. The tagged union replaces
//! the free-form value list of dynamically typed clients: each variant knows
//! its wire type, and [`CallArg::from_json`] implements the documented
//! inference rules for loosely typed inputs. Encoding is pure BCS with no
//! side effects.
//!
//! Inference priority for untagged inputs:
//! 1. binary payload → `vector<u8>`
//! 2. string in object-id lexical form → object reference
//! 3. any other string → utf8 string
//! 4. unsigned integer → `u64` (wider values need an explicit type tag)
//!
//! An explicit [`TypeTag`] supplied alongside an argument overrides
//! inference, which is how generic calls pick argument widths.

use crate::address::ObjectId;
use crate::error::{ClientError, ClientResult};
use crate::type_tag::TypeTag;
use serde::{Deserialize, Serialize};

/// One call argument, tagged with its wire type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// A binary payload, encoded as `vector<u8>`.
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    /// An unsigned 8-bit integer.
    U8(u8),
    /// An unsigned 16-bit integer.
    U16(u16),
    /// An unsigned 32-bit integer.
    U32(u32),
    /// An unsigned 64-bit integer, the default integer width.
    U64(u64),
    /// An unsigned 128-bit integer; only produced by an explicit type tag.
    U128(u128),
    /// A utf8 string.
    Text(String),
    /// A reference to an on-chain object (or a 32-byte address value).
    Object(ObjectId),
    /// A boolean.
    Bool(bool),
}

/// The wire type of an encoded argument; drives decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgKind {
    /// `vector<u8>`
    Bytes,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// utf8 string
    Text,
    /// object reference / address
    Object,
    /// `bool`
    Bool,
}

/// A call argument serialized to the ledger's binary format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedArg {
    /// The wire type of the encoded bytes.
    pub kind: ArgKind,
    /// The BCS encoding of the value.
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl CallArg {
    /// Builds an argument from a loosely typed JSON value, applying the
    /// inference rules, or the explicit `tag` override when given.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Encoding`] when a `0x`-hex string has an
    /// ambiguous length for an object id, when an integer exceeds the u64
    /// range without an explicit wider tag, or when a nested structure is
    /// passed without a declared layout.
    pub fn from_json(value: &serde_json::Value, tag: Option<&TypeTag>) -> ClientResult<Self> {
        if let Some(tag) = tag {
            return Self::from_json_tagged(value, tag);
        }

        match value {
            serde_json::Value::String(s) => Self::infer_str(s),
            serde_json::Value::Number(n) => n.as_u64().map(CallArg::U64).ok_or_else(|| {
                ClientError::encoding(format!(
                    "integer {n} does not fit in u64; supply an explicit wider type tag"
                ))
            }),
            serde_json::Value::Bool(b) => Ok(CallArg::Bool(*b)),
            serde_json::Value::Array(items) => {
                let bytes = items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .filter(|b| *b <= u8::MAX as u64)
                            .map(|b| b as u8)
                            .ok_or_else(|| {
                                ClientError::encoding(
                                    "arrays encode as vector<u8>; elements must be bytes \
                                     (nested structures need a declared layout)",
                                )
                            })
                    })
                    .collect::<ClientResult<Vec<u8>>>()?;
                Ok(CallArg::Bytes(bytes))
            }
            serde_json::Value::Object(_) | serde_json::Value::Null => Err(ClientError::encoding(
                "nested or null values have no wire encoding without a declared layout",
            )),
        }
    }

    /// Infers the wire type of a string argument.
    ///
    /// Strings in the canonical object-id form become object references;
    /// other `0x`-hex strings are rejected as ambiguous rather than silently
    /// treated as text.
    pub fn infer_str(s: &str) -> ClientResult<Self> {
        if ObjectId::is_literal(s) {
            return Ok(CallArg::Object(ObjectId::from_hex(s)?));
        }
        let looks_hex = s.len() > 2
            && s.starts_with("0x")
            && s[2..].bytes().all(|b| b.is_ascii_hexdigit());
        if looks_hex {
            return Err(ClientError::encoding(format!(
                "hex string of length {} is ambiguous for an object id (expected {} characters)",
                s.len(),
                crate::address::OBJECT_ID_LITERAL_LENGTH
            )));
        }
        Ok(CallArg::Text(s.to_string()))
    }

    fn from_json_tagged(value: &serde_json::Value, tag: &TypeTag) -> ClientResult<Self> {
        fn uint(value: &serde_json::Value, max: u128) -> ClientResult<u128> {
            let parsed = match value {
                serde_json::Value::Number(n) => n.as_u64().map(u128::from),
                serde_json::Value::String(s) => s.parse::<u128>().ok(),
                _ => None,
            };
            match parsed {
                Some(v) if v <= max => Ok(v),
                Some(v) => Err(ClientError::encoding(format!(
                    "integer {v} exceeds the declared width"
                ))),
                None => Err(ClientError::encoding(format!(
                    "expected an unsigned integer, got {value}"
                ))),
            }
        }

        match tag {
            TypeTag::U8 => Ok(CallArg::U8(uint(value, u8::MAX as u128)? as u8)),
            TypeTag::U16 => Ok(CallArg::U16(uint(value, u16::MAX as u128)? as u16)),
            TypeTag::U32 => Ok(CallArg::U32(uint(value, u32::MAX as u128)? as u32)),
            TypeTag::U64 => Ok(CallArg::U64(uint(value, u64::MAX as u128)? as u64)),
            TypeTag::U128 => Ok(CallArg::U128(uint(value, u128::MAX)?)),
            TypeTag::U256 => Err(ClientError::encoding(
                "u256 arguments must be supplied as raw bytes",
            )),
            TypeTag::Bool => match value {
                serde_json::Value::Bool(b) => Ok(CallArg::Bool(*b)),
                other => Err(ClientError::encoding(format!("expected bool, got {other}"))),
            },
            TypeTag::Address => match value.as_str() {
                Some(s) => Ok(CallArg::Object(ObjectId::from_hex(s)?)),
                None => Err(ClientError::encoding(format!(
                    "expected an address string, got {value}"
                ))),
            },
            TypeTag::Vector(inner) if **inner == TypeTag::U8 => match value {
                serde_json::Value::String(s) => Ok(CallArg::Bytes(s.as_bytes().to_vec())),
                other => Self::from_json(other, None).and_then(|arg| match arg {
                    CallArg::Bytes(b) => Ok(CallArg::Bytes(b)),
                    _ => Err(ClientError::encoding("expected a byte vector")),
                }),
            },
            other => Err(ClientError::encoding(format!(
                "no argument encoder for type tag {other}"
            ))),
        }
    }

    /// Returns the wire type of this argument.
    pub fn kind(&self) -> ArgKind {
        match self {
            CallArg::Bytes(_) => ArgKind::Bytes,
            CallArg::U8(_) => ArgKind::U8,
            CallArg::U16(_) => ArgKind::U16,
            CallArg::U32(_) => ArgKind::U32,
            CallArg::U64(_) => ArgKind::U64,
            CallArg::U128(_) => ArgKind::U128,
            CallArg::Text(_) => ArgKind::Text,
            CallArg::Object(_) => ArgKind::Object,
            CallArg::Bool(_) => ArgKind::Bool,
        }
    }

    /// Serializes this argument to its wire encoding.
    ///
    /// Pure BCS; no side effects.
    ///
    /// # Errors
    /// Returns an error if BCS serialization fails.
    pub fn encode(&self) -> ClientResult<EncodedArg> {
        let bytes = match self {
            CallArg::Bytes(v) => bcs::to_bytes(v),
            CallArg::U8(v) => bcs::to_bytes(v),
            CallArg::U16(v) => bcs::to_bytes(v),
            CallArg::U32(v) => bcs::to_bytes(v),
            CallArg::U64(v) => bcs::to_bytes(v),
            CallArg::U128(v) => bcs::to_bytes(v),
            CallArg::Text(v) => bcs::to_bytes(v),
            CallArg::Object(v) => bcs::to_bytes(v),
            CallArg::Bool(v) => bcs::to_bytes(v),
        }
        .map_err(ClientError::bcs)?;
        Ok(EncodedArg {
            kind: self.kind(),
            bytes,
        })
    }

    /// Restores an argument from its wire encoding.
    ///
    /// `decode(encode(v)) == v` holds for every variant.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a valid BCS encoding of the
    /// declared kind.
    pub fn decode(encoded: &EncodedArg) -> ClientResult<Self> {
        let arg = match encoded.kind {
            ArgKind::Bytes => CallArg::Bytes(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::U8 => CallArg::U8(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::U16 => CallArg::U16(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::U32 => CallArg::U32(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::U64 => CallArg::U64(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::U128 => CallArg::U128(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::Text => CallArg::Text(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::Object => CallArg::Object(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
            ArgKind::Bool => CallArg::Bool(bcs::from_bytes(&encoded.bytes).map_err(ClientError::bcs)?),
        };
        Ok(arg)
    }

    /// Convenience constructor for a binary payload.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        CallArg::Bytes(bytes.into())
    }

    /// Convenience constructor for a utf8 string.
    pub fn text(s: impl Into<String>) -> Self {
        CallArg::Text(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_id_literal() -> String {
        format!("0x{}", "ab".repeat(32))
    }

    #[test]
    fn test_infer_object_id() {
        let arg = CallArg::from_json(&json!(object_id_literal()), None).unwrap();
        assert!(matches!(arg, CallArg::Object(_)));
    }

    #[test]
    fn test_infer_text() {
        let arg = CallArg::from_json(&json!("Hello, Sui!"), None).unwrap();
        assert_eq!(arg, CallArg::Text("Hello, Sui!".to_string()));
    }

    #[test]
    fn test_ambiguous_hex_rejected() {
        // 0x-hex but not 66 characters: ambiguous for an object id.
        let err = CallArg::from_json(&json!("0xabc123"), None).unwrap_err();
        assert!(matches!(err, ClientError::Encoding(_)), "got {err:?}");
        // But a type path containing "::" is plain text.
        let arg = CallArg::from_json(&json!("0x2::sui::SUI"), None).unwrap();
        assert!(matches!(arg, CallArg::Text(_)));
    }

    #[test]
    fn test_infer_integer_defaults_to_u64() {
        let arg = CallArg::from_json(&json!(42), None).unwrap();
        assert_eq!(arg, CallArg::U64(42));
    }

    #[test]
    fn test_integer_overflow_needs_tag() {
        // Larger than u64::MAX; serde_json keeps it as a non-u64 number.
        let value = serde_json::Value::Number(serde_json::Number::from_f64(1e30).unwrap());
        assert!(CallArg::from_json(&value, None).is_err());

        let tagged =
            CallArg::from_json(&json!("340282366920938463463374607431768211455"), Some(&TypeTag::U128))
                .unwrap();
        assert_eq!(tagged, CallArg::U128(u128::MAX));
    }

    #[test]
    fn test_infer_byte_array() {
        let arg = CallArg::from_json(&json!([104, 105]), None).unwrap();
        assert_eq!(arg, CallArg::Bytes(vec![104, 105]));
    }

    #[test]
    fn test_nested_structure_rejected() {
        assert!(CallArg::from_json(&json!({"field": 1}), None).is_err());
        assert!(CallArg::from_json(&json!([[1, 2], [3]]), None).is_err());
        assert!(CallArg::from_json(&json!(null), None).is_err());
    }

    #[test]
    fn test_tag_overrides_inference() {
        // Without the tag this would infer u64.
        let arg = CallArg::from_json(&json!(7), Some(&TypeTag::U8)).unwrap();
        assert_eq!(arg, CallArg::U8(7));

        let err = CallArg::from_json(&json!(300), Some(&TypeTag::U8)).unwrap_err();
        assert!(matches!(err, ClientError::Encoding(_)));

        // A tagged vector<u8> turns a string into its utf8 bytes.
        let tag: TypeTag = "vector<u8>".parse().unwrap();
        let arg = CallArg::from_json(&json!("hi"), Some(&tag)).unwrap();
        assert_eq!(arg, CallArg::Bytes(b"hi".to_vec()));
    }

    #[test]
    fn test_encode_u64_layout() {
        // BCS u64 is 8 little-endian bytes.
        let encoded = CallArg::U64(1).encode().unwrap();
        assert_eq!(encoded.kind, ArgKind::U64);
        assert_eq!(encoded.bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_bytes_layout() {
        // BCS vector<u8> is a uleb128 length followed by the bytes.
        let encoded = CallArg::bytes(b"hi".to_vec()).encode().unwrap();
        assert_eq!(encoded.bytes, vec![2, 104, 105]);
    }

    #[test]
    fn test_round_trip_all_kinds() {
        let id = ObjectId::from_hex(object_id_literal()).unwrap();
        let args = vec![
            CallArg::Bytes(vec![0, 1, 2, 255]),
            CallArg::U8(8),
            CallArg::U16(16),
            CallArg::U32(32),
            CallArg::U64(64),
            CallArg::U128(128),
            CallArg::Text("round trip".to_string()),
            CallArg::Object(id),
            CallArg::Bool(true),
        ];
        for arg in args {
            let encoded = arg.encode().unwrap();
            let decoded = CallArg::decode(&encoded).unwrap();
            assert_eq!(decoded, arg);
        }
    }

    #[test]
    fn test_decode_rejects_mismatched_bytes() {
        let encoded = EncodedArg {
            kind: ArgKind::U64,
            bytes: vec![1, 2],
        };
        assert!(CallArg::decode(&encoded).is_err());
    }
}
