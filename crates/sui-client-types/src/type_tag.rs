//! Move type tags.
//!
//! Type tags name Move types on the wire: primitive scalars, vectors, and
//! fully qualified struct types such as `0x2::sui::SUI`. They are used both
//! as type arguments for generic calls and as coin-type filters for object
//! queries.

use crate::address::SuiAddress;
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The coin type of the native gas coin.
pub const GAS_COIN_TYPE: &str = "0x2::sui::SUI";

/// A Move type tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// `bool`
    Bool,
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
    /// `u256`
    U256,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// A struct type, e.g. `0x2::coin::Coin<0x2::sui::SUI>`
    Struct(Box<StructTag>),
}

/// A fully qualified Move struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    /// Address of the defining package.
    pub address: SuiAddress,
    /// Module name within the package.
    pub module: String,
    /// Struct name within the module.
    pub name: String,
    /// Type parameters, if the struct is generic.
    pub type_params: Vec<TypeTag>,
}

impl TypeTag {
    /// The type tag of the native gas coin, `0x2::sui::SUI`.
    pub fn gas_coin() -> Self {
        GAS_COIN_TYPE.parse().expect("valid gas coin type")
    }

    /// Returns true if this tag names an unsigned integer wider than u64.
    pub fn is_wide_integer(&self) -> bool {
        matches!(self, TypeTag::U128 | TypeTag::U256)
    }
}

impl FromStr for TypeTag {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s.trim())
    }
}

fn parse_type_tag(s: &str) -> ClientResult<TypeTag> {
    match s {
        "bool" => return Ok(TypeTag::Bool),
        "u8" => return Ok(TypeTag::U8),
        "u16" => return Ok(TypeTag::U16),
        "u32" => return Ok(TypeTag::U32),
        "u64" => return Ok(TypeTag::U64),
        "u128" => return Ok(TypeTag::U128),
        "u256" => return Ok(TypeTag::U256),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }

    if let Some(inner) = s.strip_prefix("vector<") {
        let inner = inner
            .strip_suffix('>')
            .ok_or_else(|| ClientError::InvalidTypeTag(s.to_string()))?;
        return Ok(TypeTag::Vector(Box::new(parse_type_tag(inner.trim())?)));
    }

    parse_struct_tag(s).map(|tag| TypeTag::Struct(Box::new(tag)))
}

fn parse_struct_tag(s: &str) -> ClientResult<StructTag> {
    let (path, type_params) = match s.find('<') {
        Some(open) => {
            let close = s
                .rfind('>')
                .filter(|close| *close == s.len() - 1)
                .ok_or_else(|| ClientError::InvalidTypeTag(s.to_string()))?;
            let params = split_top_level(&s[open + 1..close])
                .into_iter()
                .map(|p| parse_type_tag(p.trim()))
                .collect::<ClientResult<Vec<_>>>()?;
            (&s[..open], params)
        }
        None => (s, Vec::new()),
    };

    let mut parts = path.split("::");
    let (address, module, name) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(address), Some(module), Some(name), None) => (address, module, name),
        _ => return Err(ClientError::InvalidTypeTag(s.to_string())),
    };
    if module.is_empty() || name.is_empty() {
        return Err(ClientError::InvalidTypeTag(s.to_string()));
    }

    Ok(StructTag {
        address: SuiAddress::from_hex(address)
            .map_err(|_| ClientError::InvalidTypeTag(s.to_string()))?,
        module: module.to_string(),
        name: name.to_string(),
        type_params,
    })
}

/// Splits on commas that are not nested inside `<...>`.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!("u8".parse::<TypeTag>().unwrap(), TypeTag::U8);
        assert_eq!("u64".parse::<TypeTag>().unwrap(), TypeTag::U64);
        assert_eq!("bool".parse::<TypeTag>().unwrap(), TypeTag::Bool);
        assert_eq!("address".parse::<TypeTag>().unwrap(), TypeTag::Address);
    }

    #[test]
    fn test_parse_vector() {
        let tag: TypeTag = "vector<u8>".parse().unwrap();
        assert_eq!(tag, TypeTag::Vector(Box::new(TypeTag::U8)));

        let tag: TypeTag = "vector<vector<u64>>".parse().unwrap();
        assert_eq!(
            tag,
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::U64))))
        );
    }

    #[test]
    fn test_parse_struct() {
        let tag: TypeTag = GAS_COIN_TYPE.parse().unwrap();
        match &tag {
            TypeTag::Struct(s) => {
                assert_eq!(s.address, SuiAddress::TWO);
                assert_eq!(s.module, "sui");
                assert_eq!(s.name, "SUI");
                assert!(s.type_params.is_empty());
            }
            other => panic!("expected struct tag, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_generic_struct() {
        let tag: TypeTag = "0x2::coin::Coin<0x2::sui::SUI>".parse().unwrap();
        match &tag {
            TypeTag::Struct(s) => {
                assert_eq!(s.module, "coin");
                assert_eq!(s.type_params.len(), 1);
            }
            other => panic!("expected struct tag, got {other:?}"),
        }

        let tag: TypeTag = "0x1::table::Table<address, vector<u8>>".parse().unwrap();
        match &tag {
            TypeTag::Struct(s) => {
                assert_eq!(s.type_params.len(), 2);
                assert_eq!(s.type_params[0], TypeTag::Address);
            }
            other => panic!("expected struct tag, got {other:?}"),
        }
    }

    #[test]
    fn test_display_round_trip() {
        for s in [
            "u64",
            "vector<u8>",
            "0x2::coin::Coin<0x2::sui::SUI>",
            "0x1::table::Table<address, vector<u8>>",
        ] {
            let tag: TypeTag = s.parse().unwrap();
            let printed = tag.to_string();
            let reparsed: TypeTag = printed.parse().unwrap();
            assert_eq!(tag, reparsed, "round trip failed for {s}");
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<TypeTag>().is_err());
        assert!("vector<u8".parse::<TypeTag>().is_err());
        assert!("0x2::sui".parse::<TypeTag>().is_err());
        assert!("0x2::sui::SUI::extra".parse::<TypeTag>().is_err());
        assert!("zz::sui::SUI".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_wide_integer() {
        assert!(TypeTag::U128.is_wide_integer());
        assert!(TypeTag::U256.is_wide_integer());
        assert!(!TypeTag::U64.is_wide_integer());
    }
}
