/// Data models for actions, requests and results.
///
/// Action payloads are the typed form of what goes on the wire; request types
/// carry caller-facing decimal values before scaling.
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::decimal::Decimal96;

pub type SessionId = u64;
pub type TokenId = u32;
pub type MarketId = u32;
pub type OrderId = u64;
pub type AccountId = u64;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

/// How an order interacts with the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillMode {
    Limit,
    PostOnly,
    ImmediateOrCancel,
    FillOrKill,
}

/// The kind of an action, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKindTag {
    CreateSession,
    RevokeSession,
    Withdraw,
    PlaceOrder,
    CancelOrderById,
}

impl ActionKindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKindTag::CreateSession => "CreateSession",
            ActionKindTag::RevokeSession => "RevokeSession",
            ActionKindTag::Withdraw => "Withdraw",
            ActionKindTag::PlaceOrder => "PlaceOrder",
            ActionKindTag::CancelOrderById => "CancelOrderById",
        }
    }
}

impl fmt::Display for ActionKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSession {
    pub user_pubkey: PublicKey,
    pub session_pubkey: PublicKey,
    pub expiry_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeSession {
    pub session_id: SessionId,
}

/// A withdrawal; `amount` is already scaled by the token's decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdraw {
    pub session_id: SessionId,
    pub token_id: TokenId,
    pub amount: u64,
}

/// An order; `price` and `size` are already scaled by the market's decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub session_id: SessionId,
    pub market_id: MarketId,
    pub side: Side,
    pub fill_mode: FillMode,
    pub is_reduce_only: bool,
    pub price: Option<u64>,
    pub size: Option<u64>,
    pub quote_size: Option<Decimal96>,
    pub client_order_id: Option<u64>,
    pub sender_account_id: Option<AccountId>,
    pub delegator_account_id: Option<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrderById {
    pub order_id: OrderId,
    pub session_id: SessionId,
    pub sender_account_id: Option<AccountId>,
    pub delegator_account_id: Option<AccountId>,
}

/// Exactly one action payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    CreateSession(CreateSession),
    RevokeSession(RevokeSession),
    Withdraw(Withdraw),
    PlaceOrder(PlaceOrder),
    CancelOrderById(CancelOrderById),
}

impl ActionKind {
    pub fn tag(&self) -> ActionKindTag {
        match self {
            ActionKind::CreateSession(_) => ActionKindTag::CreateSession,
            ActionKind::RevokeSession(_) => ActionKindTag::RevokeSession,
            ActionKind::Withdraw(_) => ActionKindTag::Withdraw,
            ActionKind::PlaceOrder(_) => ActionKindTag::PlaceOrder,
            ActionKind::CancelOrderById(_) => ActionKindTag::CancelOrderById,
        }
    }
}

/// A built, precondition-checked action. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEnvelope {
    current_timestamp: i64,
    nonce: u64,
    kind: ActionKind,
}

impl ActionEnvelope {
    pub(crate) fn new(current_timestamp: i64, nonce: u64, kind: ActionKind) -> Self {
        Self {
            current_timestamp,
            nonce,
            kind,
        }
    }

    pub fn current_timestamp(&self) -> i64 {
        self.current_timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> ActionKindTag {
        self.kind.tag()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Caller-facing order parameters, in human units.
///
/// `price` and `size` are scaled with the market's decimals; `quote_size` is
/// carried as a [`Decimal96`]. Each is optional but must be non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub market_id: MarketId,
    pub side: Side,
    pub fill_mode: FillMode,
    #[serde(default)]
    pub is_reduce_only: bool,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub quote_size: Option<Decimal>,
    #[serde(default)]
    pub client_order_id: Option<u64>,
    #[serde(default)]
    pub sender_account_id: Option<AccountId>,
    #[serde(default)]
    pub delegator_account_id: Option<AccountId>,
}

impl PlaceOrderRequest {
    /// A limit order with price and size and no other options.
    pub fn limit(market_id: MarketId, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            market_id,
            side,
            fill_mode: FillMode::Limit,
            is_reduce_only: false,
            price: Some(price),
            size: Some(size),
            quote_size: None,
            client_order_id: None,
            sender_account_id: None,
            delegator_account_id: None,
        }
    }
}

/// Cancel by order id, optionally on behalf of a delegator (e.g. liquidation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub order_id: OrderId,
    #[serde(default)]
    pub sender_account_id: Option<AccountId>,
    #[serde(default)]
    pub delegator_account_id: Option<AccountId>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
    pub expiry_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeSessionResult {
    pub session_id: SessionId,
}

/// `amount` is the scaled amount echoed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedOrder {
    pub order_id: OrderId,
}

/// `posted` is `None` when the order filled or was discarded without resting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderResult {
    pub posted: Option<PostedOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderResult {
    pub order_id: OrderId,
}

/// A successful receipt, one variant per action kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    CreateSession(CreateSessionResult),
    RevokeSession(RevokeSessionResult),
    Withdraw(WithdrawResult),
    PlaceOrder(PlaceOrderResult),
    CancelOrderById(CancelOrderResult),
}

impl ActionResult {
    pub fn tag(&self) -> ActionKindTag {
        match self {
            ActionResult::CreateSession(_) => ActionKindTag::CreateSession,
            ActionResult::RevokeSession(_) => ActionKindTag::RevokeSession,
            ActionResult::Withdraw(_) => ActionKindTag::Withdraw,
            ActionResult::PlaceOrder(_) => ActionKindTag::PlaceOrder,
            ActionResult::CancelOrderById(_) => ActionKindTag::CancelOrderById,
        }
    }
}
