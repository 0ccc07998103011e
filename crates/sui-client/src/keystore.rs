//! Key material and signing.
//!
//! The [`Keystore`] trait is the boundary to the key/address collaborator:
//! it resolves the active signing address and produces signatures over a
//! transaction's canonical signing message. The client never holds raw key
//! material outside this module.
//!
//! Addresses are derived as the Blake2b-256 hash of the signature scheme
//! flag followed by the public key, so the same key always derives the same
//! address.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{ExpandedSecretKey, PublicKey, SecretKey, SECRET_KEY_LENGTH};
use std::fs;
use std::path::Path;
use sui_client_types::transaction::ED25519_FLAG;
use sui_client_types::{ClientError, ClientResult, Signature, SuiAddress};
use tracing::warn;

type Blake2b256 = Blake2b<U32>;

/// The key/address collaborator.
///
/// `sign_envelope` signs the Blake2b-256 hash of the given signing message
/// with the key belonging to `address`. Failures (no keys, unknown address)
/// surface as [`ClientError::Signing`].
pub trait Keystore: Send + Sync {
    /// Returns every address the keystore holds a key for.
    fn addresses(&self) -> Vec<SuiAddress>;

    /// Returns the active signing address.
    ///
    /// # Errors
    /// Returns [`ClientError::Signing`] if the keystore holds no keys.
    fn active_address(&self) -> ClientResult<SuiAddress>;

    /// Signs a transaction signing message with the key for `address`.
    ///
    /// # Errors
    /// Returns [`ClientError::Signing`] if the address is unknown.
    fn sign_envelope(&self, address: &SuiAddress, message: &[u8]) -> ClientResult<Signature>;
}

/// One ed25519 key and its derived address.
struct KeyEntry {
    address: SuiAddress,
    seed: [u8; SECRET_KEY_LENGTH],
    public: PublicKey,
}

impl KeyEntry {
    fn from_seed(seed: [u8; SECRET_KEY_LENGTH]) -> ClientResult<Self> {
        let secret = SecretKey::from_bytes(&seed)
            .map_err(|e| ClientError::Signing(format!("invalid ed25519 key: {e}")))?;
        let public = PublicKey::from(&secret);
        Ok(Self {
            address: derive_address(&public),
            seed,
            public,
        })
    }

    fn sign(&self, message: &[u8]) -> ClientResult<Signature> {
        let secret = SecretKey::from_bytes(&self.seed)
            .map_err(|e| ClientError::Signing(format!("invalid ed25519 key: {e}")))?;
        let digest: [u8; 32] = Blake2b256::digest(message).into();
        let signature = ExpandedSecretKey::from(&secret).sign(&digest, &self.public);
        Ok(Signature::new_ed25519(
            &signature.to_bytes(),
            self.public.as_bytes(),
        ))
    }
}

/// Derives the address for an ed25519 public key.
///
/// The derivation is idempotent: the same key material always yields the
/// same address.
pub fn derive_address(public_key: &PublicKey) -> SuiAddress {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    SuiAddress::new(digest)
}

/// A keystore backed by the Sui CLI keystore file.
///
/// The file format is a JSON array of base64 strings, each decoding to a
/// scheme flag byte followed by the 32-byte secret key. Only ed25519
/// entries (flag `0x00`) are loaded; other schemes are skipped.
pub struct FileKeystore {
    entries: Vec<KeyEntry>,
    active: usize,
}

impl FileKeystore {
    /// Loads a keystore file. The first entry becomes the active address.
    ///
    /// # Errors
    /// Returns [`ClientError::Signing`] if the file cannot be read or
    /// contains no usable keys.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClientError::Signing(format!("cannot read keystore {path:?}: {e}")))?;
        let encoded: Vec<String> = serde_json::from_str(&raw)?;

        let mut entries = Vec::new();
        for entry in &encoded {
            let bytes = base64::decode(entry)
                .map_err(|e| ClientError::Signing(format!("malformed keystore entry: {e}")))?;
            match bytes.split_first() {
                Some((&ED25519_FLAG, seed)) if seed.len() == SECRET_KEY_LENGTH => {
                    let mut seed_bytes = [0u8; SECRET_KEY_LENGTH];
                    seed_bytes.copy_from_slice(seed);
                    entries.push(KeyEntry::from_seed(seed_bytes)?);
                }
                Some((flag, _)) => {
                    warn!(flag, "skipping keystore entry with unsupported scheme");
                }
                None => {
                    return Err(ClientError::Signing("empty keystore entry".to_string()));
                }
            }
        }

        if entries.is_empty() {
            return Err(ClientError::Signing(format!(
                "keystore {path:?} contains no ed25519 keys"
            )));
        }
        Ok(Self { entries, active: 0 })
    }

    /// Selects the active address.
    ///
    /// # Errors
    /// Returns [`ClientError::Signing`] if the address is not in the store.
    pub fn with_active(mut self, address: SuiAddress) -> ClientResult<Self> {
        match self.entries.iter().position(|e| e.address == address) {
            Some(index) => {
                self.active = index;
                Ok(self)
            }
            None => Err(ClientError::Signing(format!(
                "address {address} not found in keystore"
            ))),
        }
    }
}

impl Keystore for FileKeystore {
    fn addresses(&self) -> Vec<SuiAddress> {
        self.entries.iter().map(|e| e.address).collect()
    }

    fn active_address(&self) -> ClientResult<SuiAddress> {
        Ok(self.entries[self.active].address)
    }

    fn sign_envelope(&self, address: &SuiAddress, message: &[u8]) -> ClientResult<Signature> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.address == *address)
            .ok_or_else(|| {
                ClientError::Signing(format!("address {address} not found in keystore"))
            })?;
        entry.sign(message)
    }
}

/// An in-memory keystore for tests and ephemeral accounts.
pub struct InMemoryKeystore {
    entries: Vec<KeyEntry>,
}

impl InMemoryKeystore {
    /// Generates a keystore with one fresh ed25519 key.
    pub fn generate() -> Self {
        let keypair = ed25519_dalek::Keypair::generate(&mut rand::rngs::OsRng);
        let entry = KeyEntry::from_seed(keypair.secret.to_bytes())
            .expect("freshly generated key is valid");
        Self {
            entries: vec![entry],
        }
    }

    /// Creates a keystore from a fixed seed, for deterministic tests.
    ///
    /// # Errors
    /// Returns [`ClientError::Signing`] if the seed is not a valid key.
    pub fn from_seed(seed: [u8; SECRET_KEY_LENGTH]) -> ClientResult<Self> {
        Ok(Self {
            entries: vec![KeyEntry::from_seed(seed)?],
        })
    }
}

impl Keystore for InMemoryKeystore {
    fn addresses(&self) -> Vec<SuiAddress> {
        self.entries.iter().map(|e| e.address).collect()
    }

    fn active_address(&self) -> ClientResult<SuiAddress> {
        self.entries
            .first()
            .map(|e| e.address)
            .ok_or_else(|| ClientError::Signing("keystore has no keys".to_string()))
    }

    fn sign_envelope(&self, address: &SuiAddress, message: &[u8]) -> ClientResult<Signature> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.address == *address)
            .ok_or_else(|| {
                ClientError::Signing(format!("address {address} not found in keystore"))
            })?;
        entry.sign(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;

    #[test]
    fn test_address_derivation_is_idempotent() {
        let seed = [7u8; SECRET_KEY_LENGTH];
        let first = InMemoryKeystore::from_seed(seed).unwrap();
        let second = InMemoryKeystore::from_seed(seed).unwrap();
        assert_eq!(
            first.active_address().unwrap(),
            second.active_address().unwrap()
        );
    }

    #[test]
    fn test_distinct_seeds_distinct_addresses() {
        let a = InMemoryKeystore::from_seed([1u8; SECRET_KEY_LENGTH]).unwrap();
        let b = InMemoryKeystore::from_seed([2u8; SECRET_KEY_LENGTH]).unwrap();
        assert_ne!(a.active_address().unwrap(), b.active_address().unwrap());
    }

    #[test]
    fn test_signature_verifies() {
        let seed = [9u8; SECRET_KEY_LENGTH];
        let keystore = InMemoryKeystore::from_seed(seed).unwrap();
        let address = keystore.active_address().unwrap();
        let message = b"canonical envelope bytes";

        let signature = keystore.sign_envelope(&address, message).unwrap();
        let bytes = signature.as_bytes();
        assert_eq!(bytes.len(), 97);
        assert_eq!(bytes[0], ED25519_FLAG);

        // flag || signature || public key
        let secret = SecretKey::from_bytes(&seed).unwrap();
        let public = PublicKey::from(&secret);
        assert_eq!(&bytes[65..], public.as_bytes());

        let dalek_sig = ed25519_dalek::Signature::try_from(&bytes[1..65]).unwrap();
        let digest: [u8; 32] = Blake2b256::digest(message).into();
        assert!(public.verify(&digest, &dalek_sig).is_ok());
    }

    #[test]
    fn test_sign_unknown_address() {
        let keystore = InMemoryKeystore::from_seed([3u8; SECRET_KEY_LENGTH]).unwrap();
        let err = keystore
            .sign_envelope(&SuiAddress::TWO, b"message")
            .unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
    }

    #[test]
    fn test_file_keystore_round_trip() {
        let seed = [5u8; SECRET_KEY_LENGTH];
        let mut entry = vec![ED25519_FLAG];
        entry.extend_from_slice(&seed);
        let contents = serde_json::to_string(&vec![base64::encode(&entry)]).unwrap();

        let path = std::env::temp_dir().join(format!(
            "sui-client-keystore-test-{}.keystore",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();

        let keystore = FileKeystore::load(&path).unwrap();
        let expected = InMemoryKeystore::from_seed(seed)
            .unwrap()
            .active_address()
            .unwrap();
        assert_eq!(keystore.active_address().unwrap(), expected);
        assert_eq!(keystore.addresses().len(), 1);

        // Selecting an address that is not in the file fails.
        assert!(FileKeystore::load(&path)
            .unwrap()
            .with_active(SuiAddress::TWO)
            .is_err());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_keystore_missing_file() {
        let err = FileKeystore::load(Path::new("/nonexistent/sui.keystore")).unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
    }

    #[test]
    fn test_generate_is_usable() {
        let keystore = InMemoryKeystore::generate();
        let address = keystore.active_address().unwrap();
        assert!(keystore.sign_envelope(&address, b"m").is_ok());
    }
}
