//! Tradewire SDK for Rust.
//!
//! Client-side action pipeline for the Tradewire exchange backend: build a
//! typed action, serialize it, frame it, sign it, send it, and decode the
//! receipt.
//!
//! # What This SDK Provides
//!
//! - High-level sender: [`ActionSender`]
//! - Signing actors with their own nonce state: [`WalletAccount`], [`TradingSession`]
//! - Exact decimal scaling and the 96-bit decimal form: [`decimal`]
//! - Length-delimited framing: [`encoding`]
//! - Ed25519, Secp256k1 and BLS12-381 signing: [`crypto`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_decimal::Decimal;
//! use tradewire_sdk::{
//!     ActionSender, KeyType, LocalWallet, NetworkConfig, PlaceOrderRequest, SessionKey, Side,
//!     StaticMetadata, WalletAccount,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tradewire_sdk::TradewireError> {
//!     let metadata = StaticMetadata::new().with_token(1, 9).with_market(7, 6, 9);
//!     let sender = ActionSender::connect(NetworkConfig::new("https://api.example.com/v1/actions"), metadata)?;
//!
//!     let mut wallet = WalletAccount::new(LocalWallet::generate()?);
//!     let mut session = sender
//!         .open_session(&mut wallet, SessionKey::generate(KeyType::Ed25519)?, None)
//!         .await?;
//!
//!     let order = PlaceOrderRequest::limit(7, Side::Bid, Decimal::new(1005, 1), Decimal::new(2, 0));
//!     let placed = sender.place_order(&mut session, &order).await?;
//!     if let Some(posted) = placed.posted {
//!         println!("resting order {}", posted.order_id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Signing Conventions
//!
//! `CreateSession` and `RevokeSession` are signed by the wallet; the 65-byte
//! recoverable signature has its recovery byte stripped. `Withdraw`,
//! `PlaceOrder` and `CancelOrderById` are signed by the session key. Every
//! request body is `varint(len(envelope)) + envelope + 64-byte signature`,
//! and the signature covers the framed bytes before it.
//!
//! # Concurrency
//!
//! Each [`WalletAccount`] and [`TradingSession`] owns its nonce allocator and
//! is used through `&mut`. To share a session between tasks, put it behind a
//! `tokio::sync::Mutex` and hold the lock across the whole call.
//!
//! # Logging
//!
//! This crate emits debug-level logs through the [`log`](https://docs.rs/log/) facade
//! for action building, submission, transport and receipt classification. Keys
//! and signatures are never logged. Configure any compatible logger in your
//! binary, then set `RUST_LOG=debug` to inspect request flow.
//!
//! # Errors
//!
//! All fallible operations return [`TradewireError`]. Use
//! [`TradewireError::class`] to separate local validation, scaling, transport,
//! protocol, crypto and backend rejections, and
//! [`TradewireError::remote_code`] to match on rejection codes. Only transport
//! failures are retryable, and only by building a new action.
pub mod action;
pub mod client;
pub mod config;
pub mod crypto;
pub mod decimal;
pub mod encoding;
pub mod errors;
pub mod metadata;
pub mod models;
pub mod nonce;
pub mod proto;
pub mod receipt;
pub mod signer;
pub mod transport;

// Re-export primary types for convenience.
pub use action::{ActionBuilder, MarketScale};
pub use client::{ActionSender, TradingSession, WalletAccount};
pub use config::{NetworkConfig, DEFAULT_SESSION_TTL};
pub use crypto::{KeyType, LocalWallet, PublicKey, SigningKey};
pub use decimal::Decimal96;
pub use errors::{ErrorClass, RemoteErrorCode, TradewireError};
pub use metadata::{MetadataProvider, StaticMetadata};
pub use models::*;
pub use nonce::{Clock, ManualClock, NonceAllocator, NonceStamp, SystemClock};
pub use receipt::ReceiptDecoder;
pub use signer::{ActionSigner, SessionKey, SessionSigner, SigningConvention, WalletSigner};
pub use transport::{HttpTransport, Transport};
