/// Action construction and envelope serialization.
///
/// [`ActionBuilder`] turns caller input into an [`ActionEnvelope`], checking
/// every per-kind precondition before anything is signed or sent.
use std::time::Duration;

use log::debug;
use prost::Message;
use rust_decimal::Decimal;

use crate::crypto::{KeyType, PublicKey};
use crate::decimal::{scale_to_u64, Decimal96};
use crate::errors::TradewireError;
use crate::models::*;
use crate::nonce::NonceStamp;
use crate::proto;

/// Decimal precision of a market's price and size fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketScale {
    pub price_decimals: u32,
    pub size_decimals: u32,
}

/// Builds one envelope stamped with a freshly allocated `(timestamp, nonce)`.
#[derive(Debug, Clone, Copy)]
pub struct ActionBuilder {
    stamp: NonceStamp,
}

impl ActionBuilder {
    pub fn new(stamp: NonceStamp) -> Self {
        Self { stamp }
    }

    pub fn stamp(&self) -> NonceStamp {
        self.stamp
    }

    fn envelope(&self, kind: ActionKind) -> ActionEnvelope {
        debug!(
            "action.build kind={} timestamp={} nonce={}",
            kind.tag(),
            self.stamp.timestamp,
            self.stamp.nonce
        );
        ActionEnvelope::new(self.stamp.timestamp, self.stamp.nonce, kind)
    }

    /// Open a session for `session_pubkey` on behalf of `user_pubkey`.
    ///
    /// `expiry_timestamp` defaults to `current_timestamp + ttl` and must be
    /// strictly in the future.
    pub fn create_session(
        &self,
        user_pubkey: PublicKey,
        session_pubkey: PublicKey,
        expiry_timestamp: Option<i64>,
        ttl: Duration,
    ) -> Result<ActionEnvelope, TradewireError> {
        let expiry = match expiry_timestamp {
            Some(expiry) => expiry,
            None => {
                let ttl_secs = i64::try_from(ttl.as_secs())
                    .map_err(|_| TradewireError::validation("session_ttl", "ttl too large"))?;
                self.stamp.timestamp.saturating_add(ttl_secs)
            }
        };
        if expiry <= self.stamp.timestamp {
            return Err(TradewireError::validation(
                "expiry_timestamp",
                format!(
                    "expiry {expiry} must be after current time {}",
                    self.stamp.timestamp
                ),
            ));
        }
        Ok(self.envelope(ActionKind::CreateSession(CreateSession {
            user_pubkey,
            session_pubkey,
            expiry_timestamp: expiry,
        })))
    }

    pub fn revoke_session(&self, session_id: SessionId) -> ActionEnvelope {
        self.envelope(ActionKind::RevokeSession(RevokeSession { session_id }))
    }

    /// Withdraw `amount` (human units) of `token_id`, scaled by `token_decimals`.
    pub fn withdraw(
        &self,
        session_id: SessionId,
        token_id: TokenId,
        amount: &Decimal,
        token_decimals: u32,
    ) -> Result<ActionEnvelope, TradewireError> {
        require_non_negative("amount", amount)?;
        let scaled = scale_to_u64(amount, token_decimals)?;
        if scaled == 0 {
            return Err(TradewireError::validation(
                "amount",
                "withdraw amount must be greater than zero",
            ));
        }
        Ok(self.envelope(ActionKind::Withdraw(Withdraw {
            session_id,
            token_id,
            amount: scaled,
        })))
    }

    /// Place an order. Price and size scale with the market's decimals;
    /// quote size is carried as a [`Decimal96`].
    pub fn place_order(
        &self,
        session_id: SessionId,
        request: &PlaceOrderRequest,
        scale: MarketScale,
    ) -> Result<ActionEnvelope, TradewireError> {
        // All sign checks run before any scaling.
        let price = request.price.as_ref();
        let size = request.size.as_ref();
        let quote_size = request.quote_size.as_ref();
        if let Some(price) = price {
            require_non_negative("price", price)?;
        }
        if let Some(size) = size {
            require_non_negative("size", size)?;
        }
        if let Some(quote_size) = quote_size {
            require_non_negative("quote_size", quote_size)?;
        }

        let price = price
            .map(|p| scale_to_u64(p, scale.price_decimals))
            .transpose()?;
        let size = size
            .map(|s| scale_to_u64(s, scale.size_decimals))
            .transpose()?;
        let quote_size = quote_size.map(Decimal96::from_decimal).transpose()?;

        Ok(self.envelope(ActionKind::PlaceOrder(PlaceOrder {
            session_id,
            market_id: request.market_id,
            side: request.side,
            fill_mode: request.fill_mode,
            is_reduce_only: request.is_reduce_only,
            price,
            size,
            quote_size,
            client_order_id: request.client_order_id,
            sender_account_id: request.sender_account_id,
            delegator_account_id: request.delegator_account_id,
        })))
    }

    pub fn cancel_order(&self, session_id: SessionId, request: &CancelOrderRequest) -> ActionEnvelope {
        self.envelope(ActionKind::CancelOrderById(CancelOrderById {
            order_id: request.order_id,
            session_id,
            sender_account_id: request.sender_account_id,
            delegator_account_id: request.delegator_account_id,
        }))
    }
}

fn require_non_negative(field: &'static str, value: &Decimal) -> Result<(), TradewireError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TradewireError::validation(
            field,
            format!("{value} must not be negative"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Wire conversion
// ---------------------------------------------------------------------------

impl ActionEnvelope {
    /// Serialize to wire schema v1.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Parse wire schema v1 bytes back into a typed envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self, TradewireError> {
        let message = proto::ActionEnvelope::decode(bytes)
            .map_err(|e| TradewireError::validation("envelope", e.to_string()))?;
        Self::from_proto(message)
    }

    pub fn to_proto(&self) -> proto::ActionEnvelope {
        let kind = match self.kind() {
            ActionKind::CreateSession(a) => proto::ActionKind::CreateSession(proto::CreateSession {
                user_pubkey: Some(public_key_to_proto(&a.user_pubkey)),
                session_pubkey: Some(public_key_to_proto(&a.session_pubkey)),
                expiry_timestamp: a.expiry_timestamp,
            }),
            ActionKind::RevokeSession(a) => proto::ActionKind::RevokeSession(proto::RevokeSession {
                session_id: a.session_id,
            }),
            ActionKind::Withdraw(a) => proto::ActionKind::Withdraw(proto::Withdraw {
                session_id: a.session_id,
                token_id: a.token_id,
                amount: a.amount,
            }),
            ActionKind::PlaceOrder(a) => proto::ActionKind::PlaceOrder(proto::PlaceOrder {
                session_id: a.session_id,
                market_id: a.market_id,
                side: side_to_proto(a.side) as i32,
                fill_mode: fill_mode_to_proto(a.fill_mode) as i32,
                is_reduce_only: a.is_reduce_only,
                price: a.price,
                size: a.size,
                quote_size: a.quote_size.map(|q| q.to_bytes().to_vec()),
                client_order_id: a.client_order_id,
                sender_account_id: a.sender_account_id,
                delegator_account_id: a.delegator_account_id,
            }),
            ActionKind::CancelOrderById(a) => {
                proto::ActionKind::CancelOrderById(proto::CancelOrderById {
                    order_id: a.order_id,
                    session_id: a.session_id,
                    sender_account_id: a.sender_account_id,
                    delegator_account_id: a.delegator_account_id,
                })
            }
        };
        proto::ActionEnvelope {
            current_timestamp: self.current_timestamp(),
            nonce: self.nonce(),
            kind: Some(kind),
        }
    }

    pub fn from_proto(message: proto::ActionEnvelope) -> Result<Self, TradewireError> {
        let kind = match message.kind {
            None => return Err(TradewireError::validation("envelope", "missing action kind")),
            Some(proto::ActionKind::CreateSession(a)) => {
                ActionKind::CreateSession(CreateSession {
                    user_pubkey: public_key_from_proto("user_pubkey", a.user_pubkey)?,
                    session_pubkey: public_key_from_proto("session_pubkey", a.session_pubkey)?,
                    expiry_timestamp: a.expiry_timestamp,
                })
            }
            Some(proto::ActionKind::RevokeSession(a)) => ActionKind::RevokeSession(RevokeSession {
                session_id: a.session_id,
            }),
            Some(proto::ActionKind::Withdraw(a)) => ActionKind::Withdraw(Withdraw {
                session_id: a.session_id,
                token_id: a.token_id,
                amount: a.amount,
            }),
            Some(proto::ActionKind::PlaceOrder(a)) => ActionKind::PlaceOrder(PlaceOrder {
                session_id: a.session_id,
                market_id: a.market_id,
                side: side_from_proto(a.side)?,
                fill_mode: fill_mode_from_proto(a.fill_mode)?,
                is_reduce_only: a.is_reduce_only,
                price: a.price,
                size: a.size,
                quote_size: a
                    .quote_size
                    .as_deref()
                    .map(Decimal96::from_bytes)
                    .transpose()?,
                client_order_id: a.client_order_id,
                sender_account_id: a.sender_account_id,
                delegator_account_id: a.delegator_account_id,
            }),
            Some(proto::ActionKind::CancelOrderById(a)) => {
                ActionKind::CancelOrderById(CancelOrderById {
                    order_id: a.order_id,
                    session_id: a.session_id,
                    sender_account_id: a.sender_account_id,
                    delegator_account_id: a.delegator_account_id,
                })
            }
        };
        Ok(ActionEnvelope::new(message.current_timestamp, message.nonce, kind))
    }
}

fn public_key_to_proto(key: &PublicKey) -> proto::PublicKey {
    let key_type = match key.key_type() {
        KeyType::Ed25519 => proto::KeyType::Ed25519,
        KeyType::Secp256k1 => proto::KeyType::Secp256k1,
        KeyType::Bls12_381 => proto::KeyType::Bls12381,
    };
    proto::PublicKey {
        key_type: key_type as i32,
        key: key.as_bytes().to_vec(),
    }
}

fn public_key_from_proto(
    field: &'static str,
    key: Option<proto::PublicKey>,
) -> Result<PublicKey, TradewireError> {
    let key = key.ok_or_else(|| TradewireError::validation(field, "missing"))?;
    let key_type = match proto::KeyType::try_from(key.key_type) {
        Ok(proto::KeyType::Ed25519) => KeyType::Ed25519,
        Ok(proto::KeyType::Secp256k1) => KeyType::Secp256k1,
        Ok(proto::KeyType::Bls12381) => KeyType::Bls12_381,
        Err(_) => {
            return Err(TradewireError::validation(
                field,
                format!("unknown key type {}", key.key_type),
            ))
        }
    };
    PublicKey::new(key_type, key.key)
}

fn side_to_proto(side: Side) -> proto::Side {
    match side {
        Side::Bid => proto::Side::Bid,
        Side::Ask => proto::Side::Ask,
    }
}

fn side_from_proto(value: i32) -> Result<Side, TradewireError> {
    match proto::Side::try_from(value) {
        Ok(proto::Side::Bid) => Ok(Side::Bid),
        Ok(proto::Side::Ask) => Ok(Side::Ask),
        Err(_) => Err(TradewireError::validation("side", format!("unknown side {value}"))),
    }
}

fn fill_mode_to_proto(mode: FillMode) -> proto::FillMode {
    match mode {
        FillMode::Limit => proto::FillMode::Limit,
        FillMode::PostOnly => proto::FillMode::PostOnly,
        FillMode::ImmediateOrCancel => proto::FillMode::ImmediateOrCancel,
        FillMode::FillOrKill => proto::FillMode::FillOrKill,
    }
}

fn fill_mode_from_proto(value: i32) -> Result<FillMode, TradewireError> {
    match proto::FillMode::try_from(value) {
        Ok(proto::FillMode::Limit) => Ok(FillMode::Limit),
        Ok(proto::FillMode::PostOnly) => Ok(FillMode::PostOnly),
        Ok(proto::FillMode::ImmediateOrCancel) => Ok(FillMode::ImmediateOrCancel),
        Ok(proto::FillMode::FillOrKill) => Ok(FillMode::FillOrKill),
        Err(_) => Err(TradewireError::validation(
            "fill_mode",
            format!("unknown fill mode {value}"),
        )),
    }
}
