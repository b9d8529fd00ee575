//! Wire schema (v1) for action envelopes and receipts.
//!
//! Hand-written `prost` messages mirroring the backend's protobuf schema.
//! Field tags are part of the wire contract and must not be renumbered.

use prost::{Enumeration, Message, Oneof};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum KeyType {
    Ed25519 = 0,
    Secp256k1 = 1,
    Bls12381 = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum Side {
    Bid = 0,
    Ask = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum FillMode {
    Limit = 0,
    PostOnly = 1,
    ImmediateOrCancel = 2,
    FillOrKill = 3,
}

#[derive(Clone, PartialEq, Message)]
pub struct PublicKey {
    #[prost(enumeration = "KeyType", tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub key: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct ActionEnvelope {
    #[prost(int64, tag = "1")]
    pub current_timestamp: i64,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
    #[prost(oneof = "ActionKind", tags = "10, 11, 12, 13, 14")]
    pub kind: Option<ActionKind>,
}

#[derive(Clone, PartialEq, Oneof)]
pub enum ActionKind {
    #[prost(message, tag = "10")]
    CreateSession(CreateSession),
    #[prost(message, tag = "11")]
    RevokeSession(RevokeSession),
    #[prost(message, tag = "12")]
    Withdraw(Withdraw),
    #[prost(message, tag = "13")]
    PlaceOrder(PlaceOrder),
    #[prost(message, tag = "14")]
    CancelOrderById(CancelOrderById),
}

#[derive(Clone, PartialEq, Message)]
pub struct CreateSession {
    #[prost(message, optional, tag = "1")]
    pub user_pubkey: Option<PublicKey>,
    #[prost(message, optional, tag = "2")]
    pub session_pubkey: Option<PublicKey>,
    #[prost(int64, tag = "3")]
    pub expiry_timestamp: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct RevokeSession {
    #[prost(uint64, tag = "1")]
    pub session_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Withdraw {
    #[prost(uint64, tag = "1")]
    pub session_id: u64,
    #[prost(uint32, tag = "2")]
    pub token_id: u32,
    #[prost(uint64, tag = "3")]
    pub amount: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlaceOrder {
    #[prost(uint64, tag = "1")]
    pub session_id: u64,
    #[prost(uint32, tag = "2")]
    pub market_id: u32,
    #[prost(enumeration = "Side", tag = "3")]
    pub side: i32,
    #[prost(enumeration = "FillMode", tag = "4")]
    pub fill_mode: i32,
    #[prost(bool, tag = "5")]
    pub is_reduce_only: bool,
    #[prost(uint64, optional, tag = "6")]
    pub price: Option<u64>,
    #[prost(uint64, optional, tag = "7")]
    pub size: Option<u64>,
    /// 16-byte fixed Decimal96 layout.
    #[prost(bytes = "vec", optional, tag = "8")]
    pub quote_size: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "9")]
    pub client_order_id: Option<u64>,
    #[prost(uint64, optional, tag = "10")]
    pub sender_account_id: Option<u64>,
    #[prost(uint64, optional, tag = "11")]
    pub delegator_account_id: Option<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CancelOrderById {
    #[prost(uint64, tag = "1")]
    pub order_id: u64,
    #[prost(uint64, tag = "2")]
    pub session_id: u64,
    #[prost(uint64, optional, tag = "3")]
    pub sender_account_id: Option<u64>,
    #[prost(uint64, optional, tag = "4")]
    pub delegator_account_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct Receipt {
    #[prost(oneof = "ReceiptResult", tags = "1, 2, 3, 4, 5, 15")]
    pub result: Option<ReceiptResult>,
}

#[derive(Clone, PartialEq, Oneof)]
pub enum ReceiptResult {
    #[prost(message, tag = "1")]
    CreateSession(CreateSessionResult),
    #[prost(message, tag = "2")]
    RevokeSession(RevokeSessionResult),
    #[prost(message, tag = "3")]
    Withdraw(WithdrawResult),
    #[prost(message, tag = "4")]
    PlaceOrder(PlaceOrderResult),
    #[prost(message, tag = "5")]
    CancelOrderById(CancelOrderByIdResult),
    #[prost(message, tag = "15")]
    Err(ReceiptError),
}

#[derive(Clone, PartialEq, Message)]
pub struct CreateSessionResult {
    #[prost(uint64, tag = "1")]
    pub session_id: u64,
    #[prost(int64, tag = "2")]
    pub expiry_timestamp: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct RevokeSessionResult {
    #[prost(uint64, tag = "1")]
    pub session_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct WithdrawResult {
    #[prost(uint64, tag = "1")]
    pub amount: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct PostedOrder {
    #[prost(uint64, tag = "1")]
    pub order_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlaceOrderResult {
    #[prost(message, optional, tag = "1")]
    pub posted: Option<PostedOrder>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CancelOrderByIdResult {
    #[prost(uint64, tag = "1")]
    pub order_id: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReceiptError {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

impl ReceiptResult {
    /// Name of the receipt variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ReceiptResult::CreateSession(_) => "CreateSession",
            ReceiptResult::RevokeSession(_) => "RevokeSession",
            ReceiptResult::Withdraw(_) => "Withdraw",
            ReceiptResult::PlaceOrder(_) => "PlaceOrder",
            ReceiptResult::CancelOrderById(_) => "CancelOrderById",
            ReceiptResult::Err(_) => "Err",
        }
    }
}
