/// Error types for the Tradewire SDK.
///
/// Every failure of the action pipeline is reported through [`TradewireError`].
/// Remote rejection codes carried by error receipts are mapped to
/// [`RemoteErrorCode`].
use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::crypto::KeyType;
use crate::models::ActionKindTag;

/// The primary error type for the Tradewire SDK.
#[derive(Error, Debug)]
pub enum TradewireError {
    // Local validation (never transmitted)
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // Decimal scaling
    #[error("Negative value {value} cannot be scaled to an unsigned integer")]
    NegativeValue { value: Decimal },

    #[error("Value {value} scaled by 10^{decimals} does not fit in {bits} bits")]
    Range {
        value: Decimal,
        decimals: u32,
        bits: u32,
    },

    #[error("Value {value} rounds to zero when scaled by 10^{decimals}")]
    PrecisionLoss { value: Decimal, decimals: u32 },

    // Framing
    #[error("Payload of {size} bytes exceeds the {limit} byte ceiling")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Invalid varint: {0}")]
    InvalidVarint(String),

    #[error("Truncated message: expected {expected} bytes, {available} available")]
    TruncatedMessage { expected: usize, available: usize },

    // Keys and signing
    #[error("Unsupported key type {key_type} for {context}")]
    UnsupportedKeyType {
        key_type: KeyType,
        context: &'static str,
    },

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    // Transport boundary
    #[error("Transport error: {0}")]
    Transport(String),

    // Protocol (client/backend skew)
    #[error("Unexpected receipt kind: expected {expected}, received {received}")]
    UnexpectedReceiptKind {
        expected: ActionKindTag,
        received: String,
    },

    #[error("Malformed receipt: {0}")]
    MalformedReceipt(String),

    // Backend business rejection
    #[error("Action rejected ({code}): {reason}")]
    ActionRejected {
        code: RemoteErrorCode,
        reason: String,
    },
}

/// Coarse classification of a [`TradewireError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Local precondition failure; fix the input and rebuild.
    Validation,
    /// Unsafe numeric representation.
    Scaling,
    /// No receipt available.
    Transport,
    /// Response shape mismatch. Always fatal.
    Protocol,
    /// Backend business rejection.
    Rejected,
    /// Key or signature failure.
    Crypto,
}

impl TradewireError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TradewireError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            TradewireError::Validation { .. }
            | TradewireError::PayloadTooLarge { .. }
            | TradewireError::InvalidVarint(_)
            | TradewireError::SessionExpired(_) => ErrorClass::Validation,
            TradewireError::NegativeValue { .. }
            | TradewireError::Range { .. }
            | TradewireError::PrecisionLoss { .. } => ErrorClass::Scaling,
            TradewireError::Transport(_) => ErrorClass::Transport,
            TradewireError::TruncatedMessage { .. }
            | TradewireError::UnexpectedReceiptKind { .. }
            | TradewireError::MalformedReceipt(_) => ErrorClass::Protocol,
            TradewireError::ActionRejected { .. } => ErrorClass::Rejected,
            TradewireError::UnsupportedKeyType { .. } | TradewireError::CryptoError(_) => {
                ErrorClass::Crypto
            }
        }
    }

    /// Returns the remote code if this is a backend rejection.
    pub fn remote_code(&self) -> Option<RemoteErrorCode> {
        match self {
            TradewireError::ActionRejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if the caller may retry by building a new action.
    ///
    /// Only transport failures qualify. A retry must never resend the same
    /// bytes: build a fresh envelope so it gets a new timestamp and nonce.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TradewireError::Transport(_))
    }
}

impl From<reqwest::Error> for TradewireError {
    fn from(err: reqwest::Error) -> Self {
        TradewireError::Transport(err.to_string())
    }
}

impl From<prost::DecodeError> for TradewireError {
    fn from(err: prost::DecodeError) -> Self {
        TradewireError::MalformedReceipt(err.to_string())
    }
}

/// Error codes carried by backend error receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorCode {
    SignatureVerification,
    InsufficientBalance,
    UnknownMarket,
    UnknownToken,
    InvalidNonce,
    TimestampOutOfRange,
    SessionNotFound,
    SessionExpired,
    OrderNotFound,
    InvalidOrder,
    UnauthorizedDelegate,
    RateLimited,
    Internal,
    Unknown(i32),
}

impl RemoteErrorCode {
    /// Map a wire code to a typed code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => RemoteErrorCode::SignatureVerification,
            2 => RemoteErrorCode::InsufficientBalance,
            3 => RemoteErrorCode::UnknownMarket,
            4 => RemoteErrorCode::UnknownToken,
            5 => RemoteErrorCode::InvalidNonce,
            6 => RemoteErrorCode::TimestampOutOfRange,
            7 => RemoteErrorCode::SessionNotFound,
            8 => RemoteErrorCode::SessionExpired,
            9 => RemoteErrorCode::OrderNotFound,
            10 => RemoteErrorCode::InvalidOrder,
            11 => RemoteErrorCode::UnauthorizedDelegate,
            12 => RemoteErrorCode::RateLimited,
            13 => RemoteErrorCode::Internal,
            other => RemoteErrorCode::Unknown(other),
        }
    }

    /// The wire value of this code.
    pub fn code(&self) -> i32 {
        match self {
            RemoteErrorCode::SignatureVerification => 1,
            RemoteErrorCode::InsufficientBalance => 2,
            RemoteErrorCode::UnknownMarket => 3,
            RemoteErrorCode::UnknownToken => 4,
            RemoteErrorCode::InvalidNonce => 5,
            RemoteErrorCode::TimestampOutOfRange => 6,
            RemoteErrorCode::SessionNotFound => 7,
            RemoteErrorCode::SessionExpired => 8,
            RemoteErrorCode::OrderNotFound => 9,
            RemoteErrorCode::InvalidOrder => 10,
            RemoteErrorCode::UnauthorizedDelegate => 11,
            RemoteErrorCode::RateLimited => 12,
            RemoteErrorCode::Internal => 13,
            RemoteErrorCode::Unknown(code) => *code,
        }
    }

    /// The backend's symbolic name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorCode::SignatureVerification => "SIGNATURE_VERIFICATION",
            RemoteErrorCode::InsufficientBalance => "INSUFFICIENT_BALANCE",
            RemoteErrorCode::UnknownMarket => "UNKNOWN_MARKET",
            RemoteErrorCode::UnknownToken => "UNKNOWN_TOKEN",
            RemoteErrorCode::InvalidNonce => "INVALID_NONCE",
            RemoteErrorCode::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            RemoteErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            RemoteErrorCode::SessionExpired => "SESSION_EXPIRED",
            RemoteErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            RemoteErrorCode::InvalidOrder => "INVALID_ORDER",
            RemoteErrorCode::UnauthorizedDelegate => "UNAUTHORIZED_DELEGATE",
            RemoteErrorCode::RateLimited => "RATE_LIMITED",
            RemoteErrorCode::Internal => "INTERNAL",
            RemoteErrorCode::Unknown(_) => "UNKNOWN",
        }
    }

    /// Human-readable reason used when the receipt carries no message.
    pub fn description(&self) -> &'static str {
        match self {
            RemoteErrorCode::SignatureVerification => "signature verification failed",
            RemoteErrorCode::InsufficientBalance => "insufficient balance",
            RemoteErrorCode::UnknownMarket => "unknown market",
            RemoteErrorCode::UnknownToken => "unknown token",
            RemoteErrorCode::InvalidNonce => "nonce already used or out of order",
            RemoteErrorCode::TimestampOutOfRange => "action timestamp outside accepted window",
            RemoteErrorCode::SessionNotFound => "session not found",
            RemoteErrorCode::SessionExpired => "session expired",
            RemoteErrorCode::OrderNotFound => "order not found",
            RemoteErrorCode::InvalidOrder => "order parameters rejected",
            RemoteErrorCode::UnauthorizedDelegate => "sender not authorized for delegator account",
            RemoteErrorCode::RateLimited => "rate limit exceeded",
            RemoteErrorCode::Internal => "internal backend error",
            RemoteErrorCode::Unknown(_) => "unrecognized error code",
        }
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorCode::Unknown(code) => write!(f, "UNKNOWN({code})"),
            other => f.write_str(other.as_str()),
        }
    }
}
