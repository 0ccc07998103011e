//! On-chain objects, owners, and coin balances.
//!
//! Every piece of on-chain state is an object with a unique id, a
//! monotonically increasing version, and an owner mode. Coins are objects
//! whose contents carry an integer balance in MIST, the smallest
//! denomination of SUI.

use crate::address::{ObjectId, SuiAddress};
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// MIST per SUI (1 SUI = 10^9 MIST).
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// The owner mode of an object.
///
/// The serde representation matches the node's JSON: unit variants appear as
/// plain strings (`"Immutable"`), data variants as single-key maps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Owned by a single address; only that address may use it.
    AddressOwner(SuiAddress),
    /// Owned by another object (dynamic fields).
    ObjectOwner(SuiAddress),
    /// Shared; usable by anyone, versioned by consensus.
    Shared {
        /// The version at which the object became shared.
        initial_shared_version: u64,
    },
    /// Immutable; usable by anyone, never versioned again.
    Immutable,
}

impl Owner {
    /// Returns true for `Immutable`.
    pub fn is_immutable(&self) -> bool {
        matches!(self, Owner::Immutable)
    }

    /// Returns the owning address for address-owned objects.
    pub fn owner_address(&self) -> Option<SuiAddress> {
        match self {
            Owner::AddressOwner(address) => Some(*address),
            _ => None,
        }
    }
}

/// A reference to a specific version of an object.
///
/// Envelopes must never reference a version older than the node's
/// last-known version for the id, or the node rejects the transaction as
/// stale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// The object id.
    pub object_id: ObjectId,
    /// The version this reference pins.
    pub version: u64,
    /// The digest of the object at that version.
    pub digest: String,
}

impl ObjectRef {
    /// Creates a new object reference.
    pub fn new(object_id: ObjectId, version: u64, digest: impl Into<String>) -> Self {
        Self {
            object_id,
            version,
            digest: digest.into(),
        }
    }
}

/// Object data as returned by the node's object queries.
///
/// Numeric fields arrive as JSON strings; accessors parse them on demand.
/// Unknown response fields are tolerated (the RPC boundary is versioned and
/// additive).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    /// The object id.
    pub object_id: ObjectId,
    /// The object version, as a decimal string.
    pub version: String,
    /// The object digest.
    pub digest: String,
    /// The full object type, when requested via `showType`.
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    /// The owner mode, when requested via `showOwner`.
    #[serde(default)]
    pub owner: Option<Owner>,
    /// The typed contents, when requested via `showContent`.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

impl ObjectData {
    /// Returns the version as u64.
    ///
    /// # Errors
    /// Returns an error if the version string cannot be parsed as u64.
    pub fn version(&self) -> ClientResult<u64> {
        self.version
            .parse()
            .map_err(|_| ClientError::encoding(format!("invalid object version: {}", self.version)))
    }

    /// Returns a reference pinning this exact version.
    ///
    /// # Errors
    /// Returns an error if the version string cannot be parsed as u64.
    pub fn object_ref(&self) -> ClientResult<ObjectRef> {
        Ok(ObjectRef::new(
            self.object_id,
            self.version()?,
            self.digest.clone(),
        ))
    }
}

/// A coin object: an object holding an integer balance of one coin type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinObject {
    /// The object id of the coin.
    pub object_id: ObjectId,
    /// The version of the coin object.
    pub version: u64,
    /// The digest of the coin object.
    pub digest: String,
    /// The coin type, e.g. `0x2::sui::SUI`.
    pub coin_type: String,
    /// Balance in the smallest denomination.
    pub balance: u64,
}

impl CoinObject {
    /// Returns a reference pinning this coin's version.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_id, self.version, self.digest.clone())
    }
}

/// A coin entry as returned by the node's coin query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinData {
    /// The coin type.
    pub coin_type: String,
    /// The object id of the coin.
    pub coin_object_id: ObjectId,
    /// The version, as a decimal string.
    pub version: String,
    /// The digest.
    pub digest: String,
    /// The balance, as a decimal string.
    pub balance: String,
}

impl CoinData {
    /// Parses this entry into a [`CoinObject`].
    ///
    /// # Errors
    /// Returns an error if the version or balance strings cannot be parsed.
    pub fn into_coin(self) -> ClientResult<CoinObject> {
        let version = self
            .version
            .parse()
            .map_err(|_| ClientError::encoding(format!("invalid coin version: {}", self.version)))?;
        let balance = self
            .balance
            .parse()
            .map_err(|_| ClientError::encoding(format!("invalid coin balance: {}", self.balance)))?;
        Ok(CoinObject {
            object_id: self.coin_object_id,
            version,
            digest: self.digest,
            coin_type: self.coin_type,
            balance,
        })
    }
}

/// One page of a paginated coin query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    /// The coins on this page.
    pub data: Vec<CoinData>,
    /// Cursor to pass back for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether another page exists.
    #[serde(default)]
    pub has_next_page: bool,
}

/// Aggregated balance for one address and coin type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// The queried address.
    pub address: SuiAddress,
    /// The coin type the totals refer to.
    pub coin_type: String,
    /// Sum of all coin balances, in the smallest denomination.
    pub total_in_mist: u64,
    /// The same total in display units (1 SUI = 10^9 MIST).
    pub total_in_sui: f64,
    /// The individual coin objects that contributed to the total.
    pub coins: Vec<CoinObject>,
}

impl BalanceInfo {
    /// Aggregates a set of coin objects into user-facing totals.
    pub fn aggregate(address: SuiAddress, coin_type: &str, coins: Vec<CoinObject>) -> Self {
        let total_in_mist: u64 = coins.iter().map(|c| c.balance).sum();
        Self {
            address,
            coin_type: coin_type.to_string(),
            total_in_mist,
            total_in_sui: total_in_mist as f64 / MIST_PER_SUI as f64,
            coins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, balance: u64) -> CoinObject {
        CoinObject {
            object_id: ObjectId::from_hex(id).unwrap(),
            version: 1,
            digest: "11111111111111111111111111111111".to_string(),
            coin_type: crate::type_tag::GAS_COIN_TYPE.to_string(),
            balance,
        }
    }

    #[test]
    fn test_owner_json_forms() {
        // Unit variants serialize to plain strings, matching the node.
        let owner: Owner = serde_json::from_str("\"Immutable\"").unwrap();
        assert!(owner.is_immutable());

        let owner: Owner =
            serde_json::from_str("{\"AddressOwner\":\"0x2\"}").unwrap();
        assert_eq!(owner.owner_address(), Some(SuiAddress::TWO));

        let owner: Owner =
            serde_json::from_str("{\"Shared\":{\"initial_shared_version\":6}}").unwrap();
        assert_eq!(
            owner,
            Owner::Shared {
                initial_shared_version: 6
            }
        );
    }

    #[test]
    fn test_balance_aggregation() {
        let coins = vec![coin("0x10", 10), coin("0x25", 25), coin("0x5", 5)];
        let info = BalanceInfo::aggregate(
            SuiAddress::TWO,
            crate::type_tag::GAS_COIN_TYPE,
            coins,
        );
        assert_eq!(info.total_in_mist, 40);
        assert_eq!(info.coins.len(), 3);
        assert!((info.total_in_sui - 40.0 / 1e9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_balance_aggregation_empty() {
        let info = BalanceInfo::aggregate(
            SuiAddress::TWO,
            crate::type_tag::GAS_COIN_TYPE,
            Vec::new(),
        );
        assert_eq!(info.total_in_mist, 0);
        assert_eq!(info.total_in_sui, 0.0);
    }

    #[test]
    fn test_coin_data_parse() {
        let json = serde_json::json!({
            "coinType": "0x2::sui::SUI",
            "coinObjectId": "0xabc",
            "version": "13",
            "digest": "9WzSGcFqXLbsrHmdnGcVPmAx1SsHpGLrWcvPbGnSkjoM",
            "balance": "5000000000",
            "previousTransaction": "tolerated-additive-field"
        });
        let data: CoinData = serde_json::from_value(json).unwrap();
        let coin = data.into_coin().unwrap();
        assert_eq!(coin.version, 13);
        assert_eq!(coin.balance, 5_000_000_000);
    }

    #[test]
    fn test_coin_data_bad_balance() {
        let json = serde_json::json!({
            "coinType": "0x2::sui::SUI",
            "coinObjectId": "0xabc",
            "version": "13",
            "digest": "digest",
            "balance": "not-a-number"
        });
        let data: CoinData = serde_json::from_value(json).unwrap();
        assert!(data.into_coin().is_err());
    }

    #[test]
    fn test_object_data_ref() {
        let json = serde_json::json!({
            "objectId": "0x7",
            "version": "42",
            "digest": "digest",
            "type": "0x2::coin::Coin<0x2::sui::SUI>",
            "owner": {"AddressOwner": "0x2"}
        });
        let data: ObjectData = serde_json::from_value(json).unwrap();
        let object_ref = data.object_ref().unwrap();
        assert_eq!(object_ref.version, 42);
        assert_eq!(object_ref.object_id, ObjectId::from_hex("0x7").unwrap());
    }
}
