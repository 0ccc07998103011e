//! Core types for the Sui contract client.
//!
//! This crate is the pure-data half of the client: addresses and object ids,
//! Move type tags, on-chain objects and coin balances, the call-argument
//! union with its BCS wire encoding, the transaction envelope, and the
//! execution-effect types returned by the node. Nothing in this crate
//! performs network access.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod argument;
pub mod effects;
pub mod error;
pub mod object;
pub mod transaction;
pub mod type_tag;

pub use address::{ObjectId, SuiAddress};
pub use argument::{ArgKind, CallArg, EncodedArg};
pub use effects::{
    ExecutionStatus, GasCostSummary, ObjectChange, SuiEvent, TransactionBlockResponse,
    TransactionEffects,
};
pub use error::{ClientError, ClientResult};
pub use object::{BalanceInfo, CoinObject, ObjectData, ObjectRef, Owner, MIST_PER_SUI};
pub use transaction::{
    MoveFunctionSignature, Signature, SignedTransaction, TransactionBuilder, TransactionData,
    TransactionDigest, TransactionKind,
};
pub use type_tag::{StructTag, TypeTag, GAS_COIN_TYPE};
