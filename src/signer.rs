//! Signing conventions for actions.
//!
//! Two conventions, selected by action kind:
//!
//! - **Wallet-signing** (`CreateSession`, `RevokeSession`): the wallet returns a
//!   hex signature string of 65 bytes; the trailing recovery byte is stripped
//!   before the signature is appended to the request.
//! - **Session-signing** (`Withdraw`, `PlaceOrder`, `CancelOrderById`): the
//!   session key returns raw signature bytes, appended unmodified.
//!
//! Both signer traits are async so that hardware or browser wallets can sit
//! behind them.

use async_trait::async_trait;

use crate::crypto::{parse_hex, to_hex_string, KeyType, LocalWallet, PublicKey, SigningKey};
use crate::errors::TradewireError;
use crate::models::ActionKindTag;

/// Length of a recoverable wallet signature before the recovery byte is stripped.
pub const WALLET_SIGNATURE_LEN: usize = 65;

/// Length of every signature appended to a request.
pub const SIGNATURE_LEN: usize = 64;

/// A wallet identity key (custodial, browser or hardware wallet).
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The account identity key.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`, returning a hex-encoded 65-byte recoverable signature.
    async fn sign_message(&self, message: &[u8]) -> Result<String, TradewireError>;
}

/// A short-lived session key authorizing trading actions.
#[async_trait]
pub trait SessionSigner: Send + Sync {
    /// The session identity key.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`, returning raw signature bytes.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TradewireError>;
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn public_key(&self) -> PublicKey {
        LocalWallet::public_key(self).clone()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<String, TradewireError> {
        Ok(to_hex_string(&self.personal_sign(message)))
    }
}

/// An in-process session key (Ed25519 or Secp256k1).
#[derive(Debug, Clone)]
pub struct SessionKey {
    key: SigningKey,
    public_key: PublicKey,
}

impl SessionKey {
    /// Wrap a signing key. BLS keys cannot be session identities.
    pub fn new(key: SigningKey) -> Result<Self, TradewireError> {
        let public_key = key.public_key()?;
        Ok(Self { key, public_key })
    }

    /// Generate a fresh session key.
    pub fn generate(key_type: KeyType) -> Result<Self, TradewireError> {
        Self::new(SigningKey::generate(key_type)?)
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

#[async_trait]
impl SessionSigner for SessionKey {
    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TradewireError> {
        Ok(self.key.sign_raw(message))
    }
}

/// Which key authenticates an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningConvention {
    Wallet,
    Session,
}

impl SigningConvention {
    pub fn for_kind(kind: ActionKindTag) -> Self {
        match kind {
            ActionKindTag::CreateSession | ActionKindTag::RevokeSession => {
                SigningConvention::Wallet
            }
            ActionKindTag::Withdraw
            | ActionKindTag::PlaceOrder
            | ActionKindTag::CancelOrderById => SigningConvention::Session,
        }
    }
}

/// Decode a wallet signature string and strip its trailing recovery byte.
pub fn decode_wallet_signature(signature: &str) -> Result<Vec<u8>, TradewireError> {
    let mut bytes = parse_hex(signature)?;
    if bytes.len() != WALLET_SIGNATURE_LEN {
        return Err(TradewireError::CryptoError(format!(
            "Wallet signature must be {WALLET_SIGNATURE_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    bytes.truncate(SIGNATURE_LEN);
    Ok(bytes)
}

/// The signer handed to the sender for one action.
#[derive(Clone, Copy)]
pub enum ActionSigner<'a> {
    Wallet(&'a dyn WalletSigner),
    Session(&'a dyn SessionSigner),
}

impl<'a> ActionSigner<'a> {
    pub fn convention(&self) -> SigningConvention {
        match self {
            ActionSigner::Wallet(_) => SigningConvention::Wallet,
            ActionSigner::Session(_) => SigningConvention::Session,
        }
    }

    /// Sign the framed request bytes of an action of the given kind.
    ///
    /// Fails if the signer's convention does not match the kind, or if the
    /// produced signature has the wrong shape.
    pub async fn sign(
        &self,
        kind: ActionKindTag,
        message: &[u8],
    ) -> Result<Vec<u8>, TradewireError> {
        let required = SigningConvention::for_kind(kind);
        if self.convention() != required {
            return Err(TradewireError::validation(
                "signer",
                format!("{kind} must be signed with the {required:?} key"),
            ));
        }

        match self {
            ActionSigner::Wallet(wallet) => {
                let signature = wallet.sign_message(message).await?;
                decode_wallet_signature(&signature)
            }
            ActionSigner::Session(session) => {
                let signature = session.sign(message).await?;
                if signature.len() != SIGNATURE_LEN {
                    return Err(TradewireError::CryptoError(format!(
                        "Session signature must be {SIGNATURE_LEN} bytes, got {}",
                        signature.len()
                    )));
                }
                Ok(signature)
            }
        }
    }
}
