use std::fmt;

use blst::min_pk as bls;
use ed25519_dalek::{Signer as _, Verifier as _};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::ecdsa::Signature as EcdsaSignature;
/// Cryptographic operations: key generation, raw signing and verification
/// per scheme, and a local secp256k1 wallet.
///
/// Implements:
/// - Ed25519: signs the message directly (64-byte signature)
/// - Secp256k1: signs SHA-256(message), 64-byte compact `r || s`, low-s
/// - BLS12-381 (min-pk): signs the message directly (96-byte G2 signature)
/// - Ethereum personal-sign for wallet-owned identity keys (65-byte `r || s || v`)
use secp256k1::{Message, PublicKey as SecpPublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::errors::TradewireError;

/// Domain separation tag for BLS signatures (proof-of-possession-free, hash-to-G2).
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// Length of an Ed25519 public key.
pub const ED25519_PUBKEY_LEN: usize = 32;

/// Length of a compressed secp256k1 public key.
pub const SECP256K1_PUBKEY_LEN: usize = 33;

/// Length of a compressed BLS12-381 (G1) public key.
pub const BLS_PUBKEY_LEN: usize = 48;

/// Signature schemes supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ed25519,
    Secp256k1,
    Bls12_381,
}

impl KeyType {
    /// Public key length for keys usable as account or session identities.
    ///
    /// BLS12-381 keys cannot be identities.
    pub fn identity_key_len(&self) -> Result<usize, TradewireError> {
        match self {
            KeyType::Ed25519 => Ok(ED25519_PUBKEY_LEN),
            KeyType::Secp256k1 => Ok(SECP256K1_PUBKEY_LEN),
            KeyType::Bls12_381 => Err(TradewireError::UnsupportedKeyType {
                key_type: *self,
                context: "identity keys",
            }),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyType::Ed25519 => "Ed25519",
            KeyType::Secp256k1 => "Secp256k1",
            KeyType::Bls12_381 => "BLS12-381",
        })
    }
}

/// An identity public key whose length matches its scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Build an identity key, checking the length against the scheme.
    pub fn new(key_type: KeyType, bytes: impl Into<Vec<u8>>) -> Result<Self, TradewireError> {
        let bytes = bytes.into();
        let expected = key_type.identity_key_len()?;
        if bytes.len() != expected {
            return Err(TradewireError::validation(
                "public_key",
                format!(
                    "{key_type} key must be {expected} bytes, got {}",
                    bytes.len()
                ),
            ));
        }
        Ok(Self { key_type, bytes })
    }

    /// Parse a "0x"-prefixed (or bare) hex key.
    pub fn from_hex(key_type: KeyType, s: &str) -> Result<Self, TradewireError> {
        Self::new(key_type, parse_hex(s)?)
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key_type, to_hex_string(&self.bytes))
    }
}

/// Private key material for one of the supported schemes.
#[derive(Clone)]
pub enum SigningKey {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(SecretKey),
    Bls12_381(bls::SecretKey),
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&self.key_type()).finish()
    }
}

impl SigningKey {
    /// Generate a fresh key from the OS RNG.
    pub fn generate(key_type: KeyType) -> Result<Self, TradewireError> {
        match key_type {
            KeyType::Ed25519 => Ok(SigningKey::Ed25519(ed25519_dalek::SigningKey::generate(
                &mut OsRng,
            ))),
            KeyType::Secp256k1 => Ok(SigningKey::Secp256k1(SecretKey::new(
                &mut rand::thread_rng(),
            ))),
            KeyType::Bls12_381 => {
                let mut ikm = [0u8; 32];
                OsRng.fill_bytes(&mut ikm);
                let key = bls::SecretKey::key_gen(&ikm, &[])
                    .map_err(|e| TradewireError::CryptoError(format!("BLS keygen: {e:?}")))?;
                Ok(SigningKey::Bls12_381(key))
            }
        }
    }

    /// Load a key from its 32-byte secret.
    pub fn from_bytes(key_type: KeyType, secret: &[u8; 32]) -> Result<Self, TradewireError> {
        match key_type {
            KeyType::Ed25519 => Ok(SigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(
                secret,
            ))),
            KeyType::Secp256k1 => SecretKey::from_slice(secret)
                .map(SigningKey::Secp256k1)
                .map_err(|e| TradewireError::CryptoError(format!("Invalid private key: {e}"))),
            KeyType::Bls12_381 => bls::SecretKey::from_bytes(secret)
                .map(SigningKey::Bls12_381)
                .map_err(|e| TradewireError::CryptoError(format!("Invalid BLS key: {e:?}"))),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            SigningKey::Ed25519(_) => KeyType::Ed25519,
            SigningKey::Secp256k1(_) => KeyType::Secp256k1,
            SigningKey::Bls12_381(_) => KeyType::Bls12_381,
        }
    }

    /// Public key bytes: 32 (Ed25519), 33 compressed (Secp256k1) or 48 compressed (BLS).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            SigningKey::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            SigningKey::Secp256k1(key) => {
                let secp = Secp256k1::new();
                SecpPublicKey::from_secret_key(&secp, key).serialize().to_vec()
            }
            SigningKey::Bls12_381(key) => key.sk_to_pk().to_bytes().to_vec(),
        }
    }

    /// The identity public key. Fails for BLS keys.
    pub fn public_key(&self) -> Result<PublicKey, TradewireError> {
        PublicKey::new(self.key_type(), self.public_key_bytes())
    }

    /// Sign `message` with this key's scheme.
    pub fn sign_raw(&self, message: &[u8]) -> Vec<u8> {
        match self {
            SigningKey::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
            SigningKey::Secp256k1(key) => {
                let secp = Secp256k1::new();
                let digest: [u8; 32] = Sha256::digest(message).into();
                let msg = Message::from_digest(digest);
                secp.sign_ecdsa(&msg, key).serialize_compact().to_vec()
            }
            SigningKey::Bls12_381(key) => key.sign(message, BLS_DST, &[]).to_bytes().to_vec(),
        }
    }
}

/// Verify a raw-scheme signature. Malformed keys or signatures are errors;
/// a well-formed signature that does not verify returns `Ok(false)`.
pub fn verify_raw(
    key_type: KeyType,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool, TradewireError> {
    match key_type {
        KeyType::Ed25519 => {
            let key_bytes: [u8; 32] = public_key.try_into().map_err(|_| {
                TradewireError::CryptoError(format!(
                    "Ed25519 public key must be 32 bytes, got {}",
                    public_key.len()
                ))
            })?;
            let key = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
                .map_err(|e| TradewireError::CryptoError(format!("Invalid Ed25519 key: {e}")))?;
            let sig = ed25519_dalek::Signature::from_slice(signature).map_err(|e| {
                TradewireError::CryptoError(format!("Invalid Ed25519 signature: {e}"))
            })?;
            Ok(key.verify(message, &sig).is_ok())
        }
        KeyType::Secp256k1 => {
            let secp = Secp256k1::new();
            let key = SecpPublicKey::from_slice(public_key).map_err(|e| {
                TradewireError::CryptoError(format!("Invalid secp256k1 key: {e}"))
            })?;
            let sig = EcdsaSignature::from_compact(signature).map_err(|e| {
                TradewireError::CryptoError(format!("Invalid secp256k1 signature: {e}"))
            })?;
            let digest: [u8; 32] = Sha256::digest(message).into();
            let msg = Message::from_digest(digest);
            Ok(secp.verify_ecdsa(&msg, &sig, &key).is_ok())
        }
        KeyType::Bls12_381 => {
            let key = bls::PublicKey::from_bytes(public_key)
                .map_err(|e| TradewireError::CryptoError(format!("Invalid BLS key: {e:?}")))?;
            let sig = bls::Signature::from_bytes(signature).map_err(|e| {
                TradewireError::CryptoError(format!("Invalid BLS signature: {e:?}"))
            })?;
            let result = sig.verify(true, message, BLS_DST, &[], &key, true);
            Ok(result == blst::BLST_ERROR::BLST_SUCCESS)
        }
    }
}

/// Ethereum personal-sign digest:
/// keccak256("\x19Ethereum Signed Message:\n" + str(len(message)) + message)
pub fn personal_sign_digest(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// An in-process secp256k1 wallet producing 65-byte recoverable personal signatures.
#[derive(Clone)]
pub struct LocalWallet {
    secret_key: SecretKey,
    public_key: PublicKey,
    evm_address: [u8; 20],
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWallet")
            .field("public_key", &self.public_key)
            .field("evm_address", &to_hex_string(&self.evm_address))
            .finish()
    }
}

impl LocalWallet {
    /// Generate a fresh wallet key.
    pub fn generate() -> Result<Self, TradewireError> {
        Self::from_secret(SecretKey::new(&mut rand::thread_rng()))
    }

    /// Load a wallet from a private key.
    pub fn from_private_key(private_key: &[u8; 32]) -> Result<Self, TradewireError> {
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| TradewireError::CryptoError(format!("Invalid private key: {e}")))?;
        Self::from_secret(secret_key)
    }

    /// Load a wallet from a private key hex string.
    pub fn from_hex(private_key_hex: &str) -> Result<Self, TradewireError> {
        Self::from_private_key(&parse_hex_32(private_key_hex)?)
    }

    fn from_secret(secret_key: SecretKey) -> Result<Self, TradewireError> {
        let secp = Secp256k1::new();
        let pubkey = SecpPublicKey::from_secret_key(&secp, &secret_key);
        let public_key = PublicKey::new(KeyType::Secp256k1, pubkey.serialize().to_vec())?;

        // EVM address = last 20 bytes of keccak256(uncompressed_pubkey[1..65])
        let uncompressed = pubkey.serialize_uncompressed();
        let hash = Keccak256::digest(&uncompressed[1..65]);
        let mut evm_address = [0u8; 20];
        evm_address.copy_from_slice(&hash[12..32]);

        Ok(Self {
            secret_key,
            public_key,
            evm_address,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn evm_address(&self) -> &[u8; 20] {
        &self.evm_address
    }

    /// Sign with the personal-sign prefix. Returns `r || s || v` with `v = 27 + recovery_id`.
    pub fn personal_sign(&self, message: &[u8]) -> [u8; 65] {
        let secp = Secp256k1::new();
        let msg = Message::from_digest(personal_sign_digest(message));
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&msg, &self.secret_key)
            .serialize_compact();

        let mut result = [0u8; 65];
        result[..64].copy_from_slice(&compact);
        result[64] = 27 + recovery_id.to_i32() as u8;
        result
    }
}

/// Verify a 64-byte `r || s` personal signature (recovery byte already stripped).
pub fn verify_personal_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, TradewireError> {
    if public_key.key_type() != KeyType::Secp256k1 {
        return Err(TradewireError::UnsupportedKeyType {
            key_type: public_key.key_type(),
            context: "personal signatures",
        });
    }
    let secp = Secp256k1::new();
    let key = SecpPublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| TradewireError::CryptoError(format!("Invalid secp256k1 key: {e}")))?;
    let mut sig = EcdsaSignature::from_compact(signature)
        .map_err(|e| TradewireError::CryptoError(format!("Invalid signature: {e}")))?;
    sig.normalize_s();
    let msg = Message::from_digest(personal_sign_digest(message));
    Ok(secp.verify_ecdsa(&msg, &sig, &key).is_ok())
}

/// Format bytes as a "0x"-prefixed hex string.
pub fn to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a "0x"-prefixed (or bare) hex string.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, TradewireError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| TradewireError::CryptoError(format!("Invalid hex: {e}")))
}

/// Parse a "0x"-prefixed hex string into a 32-byte array.
pub fn parse_hex_32(s: &str) -> Result<[u8; 32], TradewireError> {
    let bytes = parse_hex(s)?;
    bytes.as_slice().try_into().map_err(|_| {
        TradewireError::CryptoError(format!("Expected 32 bytes, got {}", bytes.len()))
    })
}
