//! Length-delimited framing for request and response bodies.
//!
//! Implements the exact byte layouts expected by the backend:
//! - unsigned LEB128 varints (7 payload bits per byte, high bit = continuation)
//! - length prefixes limited to `0..=i32::MAX`
//! - `varint(len(payload)) + payload` frames, capped at [`MAX_PAYLOAD_SIZE`]

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::errors::TradewireError;

/// Payload ceiling for a single frame: 100 KB.
pub const MAX_PAYLOAD_SIZE: usize = 100 * 1024;

/// Largest value a varint length prefix may carry.
pub const MAX_VARINT_VALUE: u32 = i32::MAX as u32;

/// A value <= i32::MAX never needs more than 5 bytes.
const MAX_VARINT_BYTES: usize = 5;

/// Encode a length as an unsigned LEB128 varint.
///
/// Negative values and values above `i32::MAX` are rejected.
pub fn encode_varint(value: i64) -> Result<Vec<u8>, TradewireError> {
    if value < 0 {
        return Err(TradewireError::InvalidVarint(format!(
            "negative value {value}"
        )));
    }
    if value > i64::from(MAX_VARINT_VALUE) {
        return Err(TradewireError::InvalidVarint(format!(
            "value {value} exceeds {MAX_VARINT_VALUE}"
        )));
    }

    let mut remaining = value as u32;
    let mut result = Vec::with_capacity(MAX_VARINT_BYTES);
    loop {
        let byte = (remaining & 0x7F) as u8;
        remaining >>= 7;
        if remaining == 0 {
            result.push(byte);
            return Ok(result);
        }
        result.push(byte | 0x80);
    }
}

/// Encode a length supplied as a decimal. Non-integral values are rejected.
pub fn encode_varint_decimal(value: &Decimal) -> Result<Vec<u8>, TradewireError> {
    if !value.fract().is_zero() {
        return Err(TradewireError::InvalidVarint(format!(
            "non-integer value {value}"
        )));
    }
    let integral = value
        .to_i64()
        .ok_or_else(|| TradewireError::InvalidVarint(format!("value {value} out of range")))?;
    encode_varint(integral)
}

/// Decode a varint from the start of `bytes`, returning `(value, bytes_consumed)`.
pub fn decode_varint(bytes: &[u8]) -> Result<(u32, usize), TradewireError> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if i == MAX_VARINT_BYTES {
            return Err(TradewireError::InvalidVarint(format!(
                "longer than {MAX_VARINT_BYTES} bytes"
            )));
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            if value > u64::from(MAX_VARINT_VALUE) {
                return Err(TradewireError::InvalidVarint(format!(
                    "value {value} exceeds {MAX_VARINT_VALUE}"
                )));
            }
            return Ok((value as u32, i + 1));
        }
    }
    Err(TradewireError::TruncatedMessage {
        expected: bytes.len() + 1,
        available: bytes.len(),
    })
}

/// Frame a payload: `varint(len(payload)) + payload`.
pub fn encode_delimited(payload: &[u8]) -> Result<Vec<u8>, TradewireError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(TradewireError::PayloadTooLarge {
            size: payload.len(),
            limit: MAX_PAYLOAD_SIZE,
        });
    }
    let prefix = encode_varint(payload.len() as i64)?;
    let mut result = Vec::with_capacity(prefix.len() + payload.len());
    result.extend_from_slice(&prefix);
    result.extend_from_slice(payload);
    Ok(result)
}

/// Read one frame from the start of `bytes`, returning `(payload, bytes_consumed)`.
///
/// Trailing bytes after the frame are left to the caller.
pub fn decode_delimited(bytes: &[u8]) -> Result<(&[u8], usize), TradewireError> {
    let (len, prefix_len) = decode_varint(bytes)?;
    let len = len as usize;
    if len > MAX_PAYLOAD_SIZE {
        return Err(TradewireError::PayloadTooLarge {
            size: len,
            limit: MAX_PAYLOAD_SIZE,
        });
    }
    let available = bytes.len() - prefix_len;
    if available < len {
        return Err(TradewireError::TruncatedMessage {
            expected: len,
            available,
        });
    }
    let end = prefix_len + len;
    Ok((&bytes[prefix_len..end], end))
}
