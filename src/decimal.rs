/// Decimal scaling for amounts, prices and sizes.
///
/// Converts [`rust_decimal::Decimal`] values to bounded-width unsigned
/// integers (`value * 10^decimals`) and to the 96-bit-mantissa fixed decimal
/// wire form. Scaling is exact integer arithmetic on the decimal's mantissa:
/// it truncates toward zero, never rounds a nonzero value to zero, and never
/// wraps.
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::TradewireError;

/// Largest magnitude representable in a [`Decimal96`].
pub const DECIMAL96_MAX_MAGNITUDE: u128 = (1u128 << 96) - 1;

/// Largest scale (fractional digits) representable in a [`Decimal96`].
pub const DECIMAL96_MAX_SCALE: u8 = 28;

const SIGN_BIT: u8 = 0x80;
const SCALE_MASK: u8 = 0x1F;

/// Target width of a scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledWidth {
    U64,
    U128,
}

impl ScaledWidth {
    pub fn bits(&self) -> u32 {
        match self {
            ScaledWidth::U64 => 64,
            ScaledWidth::U128 => 128,
        }
    }

    pub fn max_value(&self) -> u128 {
        match self {
            ScaledWidth::U64 => u64::MAX as u128,
            ScaledWidth::U128 => u128::MAX,
        }
    }
}

/// Compute `truncate(value * 10^decimals)` as an unsigned integer of the given width.
///
/// - zero (including negative zero) yields `0`
/// - a negative value fails with [`TradewireError::NegativeValue`]
/// - a nonzero value that truncates to `0` fails with [`TradewireError::PrecisionLoss`]
/// - a result above `2^bits - 1` fails with [`TradewireError::Range`]
pub fn scale_to_uint(
    value: &Decimal,
    decimals: u32,
    width: ScaledWidth,
) -> Result<u128, TradewireError> {
    if value.is_zero() {
        return Ok(0);
    }
    if value.is_sign_negative() {
        return Err(TradewireError::NegativeValue { value: *value });
    }

    let range_error = || TradewireError::Range {
        value: *value,
        decimals,
        bits: width.bits(),
    };

    let mantissa = value.mantissa().unsigned_abs();
    let scale = value.scale();

    let scaled = if decimals >= scale {
        10u128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .ok_or_else(range_error)?
    } else {
        // scale <= 28, so the divisor always fits
        mantissa / 10u128.pow(scale - decimals)
    };

    if scaled == 0 {
        return Err(TradewireError::PrecisionLoss {
            value: *value,
            decimals,
        });
    }
    if scaled > width.max_value() {
        return Err(range_error());
    }
    Ok(scaled)
}

/// Scale to a 64-bit unsigned integer. See [`scale_to_uint`].
pub fn scale_to_u64(value: &Decimal, decimals: u32) -> Result<u64, TradewireError> {
    let scaled = scale_to_uint(value, decimals, ScaledWidth::U64)?;
    Ok(scaled as u64)
}

/// Scale to a 128-bit unsigned integer. See [`scale_to_uint`].
pub fn scale_to_u128(value: &Decimal, decimals: u32) -> Result<u128, TradewireError> {
    scale_to_uint(value, decimals, ScaledWidth::U128)
}

/// Reverse a scaled integer back to a decimal. Fails if the result does not fit a `Decimal`.
pub fn unscale(scaled: u128, decimals: u32) -> Result<Decimal, TradewireError> {
    let mantissa = i128::try_from(scaled)
        .map_err(|_| TradewireError::validation("scaled", format!("{scaled} exceeds i128")))?;
    Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map_err(|e| TradewireError::validation("scaled", format!("{scaled}e-{decimals}: {e}")))
}

/// A signed decimal with a 96-bit magnitude and a scale of 0..=28.
///
/// Fixed wire layout (16 bytes):
/// - byte 0: bit 7 = sign, bits 0..4 = scale
/// - bytes 1..4: reserved, zero
/// - bytes 4..16: little-endian 96-bit magnitude
///
/// The compact layout keeps byte 0 and trims the magnitude to its minimal
/// little-endian bytes (at least one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal96 {
    negative: bool,
    scale: u8,
    magnitude: u128,
}

impl Decimal96 {
    pub const ZERO: Self = Self {
        negative: false,
        scale: 0,
        magnitude: 0,
    };

    /// Build from raw parts, checking the scale and magnitude bounds.
    pub fn from_parts(negative: bool, scale: u8, magnitude: u128) -> Result<Self, TradewireError> {
        if scale > DECIMAL96_MAX_SCALE {
            return Err(TradewireError::validation(
                "decimal96",
                format!("scale {scale} exceeds {DECIMAL96_MAX_SCALE}"),
            ));
        }
        if magnitude > DECIMAL96_MAX_MAGNITUDE {
            return Err(TradewireError::validation(
                "decimal96",
                format!("magnitude {magnitude} exceeds 96 bits"),
            ));
        }
        Ok(Self {
            negative: negative && magnitude != 0,
            scale,
            magnitude,
        })
    }

    /// Normalize a decimal to its minimal-scale mantissa/exponent pair.
    pub fn from_decimal(value: &Decimal) -> Result<Self, TradewireError> {
        let normalized = value.normalize();
        let scale = u8::try_from(normalized.scale()).map_err(|_| {
            TradewireError::validation("decimal96", format!("scale of {value} out of range"))
        })?;
        Self::from_parts(
            normalized.is_sign_negative(),
            scale,
            normalized.mantissa().unsigned_abs(),
        )
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }

    fn flags(&self) -> u8 {
        let sign = if self.negative { SIGN_BIT } else { 0 };
        sign | self.scale
    }

    fn parse_flags(flags: u8) -> Result<(bool, u8), TradewireError> {
        if flags & !(SIGN_BIT | SCALE_MASK) != 0 {
            return Err(TradewireError::validation(
                "decimal96",
                format!("reserved flag bits set in 0x{flags:02x}"),
            ));
        }
        Ok((flags & SIGN_BIT != 0, flags & SCALE_MASK))
    }

    /// Encode to the 16-byte fixed layout.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0] = self.flags();
        out[4..16].copy_from_slice(&self.magnitude.to_le_bytes()[..12]);
        out
    }

    /// Decode the 16-byte fixed layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TradewireError> {
        if bytes.len() != 16 {
            return Err(TradewireError::validation(
                "decimal96",
                format!("expected 16 bytes, got {}", bytes.len()),
            ));
        }
        let (negative, scale) = Self::parse_flags(bytes[0])?;
        if bytes[1..4] != [0, 0, 0] {
            return Err(TradewireError::validation(
                "decimal96",
                "reserved bytes 1..4 must be zero",
            ));
        }
        let mut le = [0u8; 16];
        le[..12].copy_from_slice(&bytes[4..16]);
        Self::from_parts(negative, scale, u128::from_le_bytes(le))
    }

    /// Encode to the compact layout: flag byte followed by the minimal magnitude bytes.
    pub fn to_compact_bytes(&self) -> Vec<u8> {
        let le = self.magnitude.to_le_bytes();
        let used = le[..12]
            .iter()
            .rposition(|b| *b != 0)
            .map_or(1, |last| last + 1);
        let mut out = Vec::with_capacity(1 + used);
        out.push(self.flags());
        out.extend_from_slice(&le[..used]);
        out
    }

    /// Decode the compact layout.
    pub fn from_compact_bytes(bytes: &[u8]) -> Result<Self, TradewireError> {
        let (flags, magnitude_bytes) = bytes.split_first().ok_or_else(|| {
            TradewireError::validation("decimal96", "empty compact decimal")
        })?;
        if magnitude_bytes.is_empty() || magnitude_bytes.len() > 12 {
            return Err(TradewireError::validation(
                "decimal96",
                format!("compact magnitude of {} bytes", magnitude_bytes.len()),
            ));
        }
        let (negative, scale) = Self::parse_flags(*flags)?;
        let mut le = [0u8; 16];
        le[..magnitude_bytes.len()].copy_from_slice(magnitude_bytes);
        Self::from_parts(negative, scale, u128::from_le_bytes(le))
    }

    /// Convert back to a `Decimal`. Exact for every representable value.
    pub fn to_decimal(&self) -> Decimal {
        // magnitude < 2^96 and scale <= 28, both within Decimal's bounds
        let signed = if self.negative {
            -(self.magnitude as i128)
        } else {
            self.magnitude as i128
        };
        Decimal::from_i128_with_scale(signed, u32::from(self.scale))
    }
}

/// Convert a decimal to its fixed 96-bit representation.
pub fn to_fixed_decimal96(value: &Decimal) -> Result<Decimal96, TradewireError> {
    Decimal96::from_decimal(value)
}

impl TryFrom<Decimal> for Decimal96 {
    type Error = TradewireError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(&value)
    }
}

impl From<Decimal96> for Decimal {
    fn from(value: Decimal96) -> Self {
        value.to_decimal()
    }
}

impl FromStr for Decimal96 {
    type Err = TradewireError;

    /// Parses without rounding: more than 28 fractional digits or a magnitude
    /// above 96 bits is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let d = Decimal::from_str_exact(s)
            .map_err(|e| TradewireError::validation("decimal96", format!("'{s}': {e}")))?;
        Self::from_decimal(&d)
    }
}

impl fmt::Display for Decimal96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
