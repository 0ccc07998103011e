//! Transaction envelopes.
//!
//! A [`TransactionData`] envelope carries the sender, one operation
//! (publish or move-call), the gas payment references, and the gas budget.
//! Assembly through [`TransactionBuilder`] is pure: no network access, and
//! argument order is preserved exactly as supplied.

use crate::address::{ObjectId, SuiAddress};
use crate::argument::EncodedArg;
use crate::error::{ClientError, ClientResult};
use crate::object::ObjectRef;
use crate::type_tag::TypeTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent scope/version/app-id prefix for transaction signing messages.
const INTENT_PREFIX: [u8; 3] = [0, 0, 0];

/// The digest of a transaction, assigned by the node on submission.
///
/// Nodes deduplicate submissions by digest, which is what makes resubmitting
/// an already-accepted envelope a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionDigest(pub String);

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionDigest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The single operation carried by an envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Publish a compiled package.
    Publish {
        /// Compiled module bytecode.
        modules: Vec<Vec<u8>>,
        /// Package ids of transitive dependencies.
        dependencies: Vec<ObjectId>,
    },
    /// Call a function in a published package.
    MoveCall {
        /// The package containing the module.
        package: ObjectId,
        /// The module name.
        module: String,
        /// The function name.
        function: String,
        /// Type arguments for generic functions.
        type_args: Vec<TypeTag>,
        /// Encoded arguments, in call order.
        args: Vec<EncodedArg>,
    },
}

/// An unsigned transaction envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    /// The sending address.
    pub sender: SuiAddress,
    /// The operation to execute.
    pub kind: TransactionKind,
    /// Coin objects paying for gas. Versions must be current.
    pub gas_payment: Vec<ObjectRef>,
    /// Gas price in MIST per gas unit.
    pub gas_price: u64,
    /// Maximum gas cost in MIST this transaction may consume.
    pub gas_budget: u64,
}

impl TransactionData {
    /// Returns the canonical bytes the keystore signs: the intent prefix
    /// followed by the BCS encoding of the envelope.
    ///
    /// # Errors
    /// Returns an error if BCS serialization fails.
    pub fn signing_message(&self) -> ClientResult<Vec<u8>> {
        let mut message = INTENT_PREFIX.to_vec();
        let mut body = bcs::to_bytes(self).map_err(ClientError::bcs)?;
        message.append(&mut body);
        Ok(message)
    }

    /// Returns the BCS encoding of the envelope.
    ///
    /// # Errors
    /// Returns an error if BCS serialization fails.
    pub fn to_bytes(&self) -> ClientResult<Vec<u8>> {
        bcs::to_bytes(self).map_err(ClientError::bcs)
    }

    /// Returns the base64 `tx_bytes` form submitted to the node.
    ///
    /// # Errors
    /// Returns an error if BCS serialization fails.
    pub fn to_base64(&self) -> ClientResult<String> {
        Ok(base64::encode(self.to_bytes()?))
    }
}

/// A serialized signature: scheme flag, raw signature, then public key,
/// base64-encoded on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "serde_bytes")] Vec<u8>);

/// Signature scheme flag for ed25519.
pub const ED25519_FLAG: u8 = 0x00;

impl Signature {
    /// Assembles an ed25519 signature from its raw parts.
    pub fn new_ed25519(signature: &[u8], public_key: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(1 + signature.len() + public_key.len());
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(public_key);
        Self(bytes)
    }

    /// Returns the raw flag-prefixed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the base64 form sent over the wire.
    pub fn to_base64(&self) -> String {
        base64::encode(&self.0)
    }
}

/// A signed transaction envelope, ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The envelope.
    pub data: TransactionData,
    /// Signatures over the envelope's signing message.
    pub signatures: Vec<Signature>,
}

impl SignedTransaction {
    /// Creates a signed transaction from an envelope and its signatures.
    pub fn new(data: TransactionData, signatures: Vec<Signature>) -> Self {
        Self { data, signatures }
    }

    /// Returns the base64 `tx_bytes` for submission.
    ///
    /// # Errors
    /// Returns an error if BCS serialization fails.
    pub fn tx_bytes_base64(&self) -> ClientResult<String> {
        self.data.to_base64()
    }

    /// Returns the base64 signatures for submission.
    pub fn signatures_base64(&self) -> Vec<String> {
        self.signatures.iter().map(Signature::to_base64).collect()
    }
}

/// The signature of a Move function, from the node's normalized module view.
///
/// Used to validate argument arity before submission when available; when
/// introspection fails the mismatch is deferred to node-side failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFunctionSignature {
    /// Function visibility.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Whether the function is an entry point.
    #[serde(default)]
    pub is_entry: bool,
    /// Declared parameter types, in normalized JSON form.
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
}

impl MoveFunctionSignature {
    /// Returns the number of caller-supplied arguments the function takes.
    ///
    /// A trailing `TxContext` parameter is injected by the runtime and is
    /// not counted.
    pub fn arity(&self) -> usize {
        let mut count = self.parameters.len();
        if let Some(last) = self.parameters.last() {
            if last.to_string().contains("TxContext") {
                count -= 1;
            }
        }
        count
    }
}

/// A builder for transaction envelopes.
///
/// # Example
///
/// ```rust
/// use sui_client_types::{CallArg, ObjectId, ObjectRef, SuiAddress, TransactionBuilder};
///
/// let package = ObjectId::from_hex("0x42").unwrap();
/// let gas = ObjectRef::new(ObjectId::from_hex("0x7").unwrap(), 3, "digest".to_string());
/// let args = vec![CallArg::bytes(b"hi".to_vec()).encode().unwrap()];
///
/// let data = TransactionBuilder::new()
///     .sender(SuiAddress::TWO)
///     .move_call(package, "example", "emit", vec![], args)
///     .gas_payment(vec![gas])
///     .gas_price(1000)
///     .gas_budget(10_000_000)
///     .build()
///     .unwrap();
/// assert_eq!(data.gas_budget, 10_000_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    sender: Option<SuiAddress>,
    kind: Option<TransactionKind>,
    gas_payment: Vec<ObjectRef>,
    gas_price: Option<u64>,
    gas_budget: Option<u64>,
    function_signature: Option<MoveFunctionSignature>,
}

impl TransactionBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender address.
    #[must_use]
    pub fn sender(mut self, sender: SuiAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the operation from an already-built kind value.
    #[must_use]
    pub fn operation(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets a publish operation from a compiled package.
    #[must_use]
    pub fn publish(mut self, modules: Vec<Vec<u8>>, dependencies: Vec<ObjectId>) -> Self {
        self.kind = Some(TransactionKind::Publish {
            modules,
            dependencies,
        });
        self
    }

    /// Sets a move-call operation.
    ///
    /// Argument order is preserved exactly as supplied.
    #[must_use]
    pub fn move_call(
        mut self,
        package: ObjectId,
        module: impl Into<String>,
        function: impl Into<String>,
        type_args: Vec<TypeTag>,
        args: Vec<EncodedArg>,
    ) -> Self {
        self.kind = Some(TransactionKind::MoveCall {
            package,
            module: module.into(),
            function: function.into(),
            type_args,
            args,
        });
        self
    }

    /// Supplies the target function's signature for arity validation.
    ///
    /// Without it, an argument-count mismatch is left to the node to reject.
    #[must_use]
    pub fn function_signature(mut self, signature: MoveFunctionSignature) -> Self {
        self.function_signature = Some(signature);
        self
    }

    /// Sets the gas payment objects.
    #[must_use]
    pub fn gas_payment(mut self, payment: Vec<ObjectRef>) -> Self {
        self.gas_payment = payment;
        self
    }

    /// Sets the gas price in MIST per gas unit.
    #[must_use]
    pub fn gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Sets the gas budget in MIST.
    #[must_use]
    pub fn gas_budget(mut self, gas_budget: u64) -> Self {
        self.gas_budget = Some(gas_budget);
        self
    }

    /// Builds the envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing (`sender`, operation,
    /// `gas_price`, `gas_budget`, or a non-empty gas payment), or
    /// [`ClientError::ArityMismatch`] when a supplied function signature
    /// disagrees with the argument count.
    pub fn build(self) -> ClientResult<TransactionData> {
        let sender = self
            .sender
            .ok_or_else(|| ClientError::transaction("sender is required"))?;
        let kind = self
            .kind
            .ok_or_else(|| ClientError::transaction("an operation (publish or move_call) is required"))?;
        let gas_price = self
            .gas_price
            .ok_or_else(|| ClientError::transaction("gas_price is required"))?;
        let gas_budget = self
            .gas_budget
            .ok_or_else(|| ClientError::transaction("gas_budget is required"))?;
        if self.gas_payment.is_empty() {
            return Err(ClientError::transaction(
                "at least one gas payment object is required",
            ));
        }

        if let (
            Some(signature),
            TransactionKind::MoveCall {
                package,
                module,
                function,
                args,
                ..
            },
        ) = (&self.function_signature, &kind)
        {
            let expected = signature.arity();
            if args.len() != expected {
                return Err(ClientError::ArityMismatch {
                    function: format!("{}::{}::{}", package.to_hex(), module, function),
                    expected,
                    got: args.len(),
                });
            }
        }

        Ok(TransactionData {
            sender,
            kind,
            gas_payment: self.gas_payment,
            gas_price,
            gas_budget,
        })
    }
}
