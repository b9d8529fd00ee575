/// Unit tests for the framing module.
///
/// Tests varint byte layouts, length bounds, and length-delimited frames.
use rust_decimal_macros::dec;
use tradewire_sdk::encoding::*;
use tradewire_sdk::TradewireError;

#[test]
fn test_varint_single_byte() {
    assert_eq!(encode_varint(0).unwrap(), vec![0x00]);
    assert_eq!(encode_varint(10).unwrap(), vec![0x0A]);
    assert_eq!(encode_varint(127).unwrap(), vec![0x7F]);
}

#[test]
fn test_varint_known_values() {
    assert_eq!(encode_varint(128).unwrap(), vec![0x80, 0x01]);
    assert_eq!(encode_varint(300).unwrap(), vec![0xAC, 0x02]);
    assert_eq!(encode_varint(0x0ff56).unwrap(), vec![0xD6, 0xFE, 0x03]);
    assert_eq!(
        encode_varint(0x773cf53f).unwrap(),
        vec![0xBF, 0xEA, 0xF3, 0xB9, 0x07]
    );
}

#[test]
fn test_varint_max_value_is_five_bytes() {
    let bytes = encode_varint(i64::from(i32::MAX)).unwrap();
    assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
}

#[test]
fn test_varint_rejects_negative() {
    let err = encode_varint(-100).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_varint_rejects_above_i32_max() {
    let err = encode_varint(i64::from(i32::MAX) + 1).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_varint_decimal_integral() {
    assert_eq!(encode_varint_decimal(&dec!(300)).unwrap(), vec![0xAC, 0x02]);
    assert_eq!(encode_varint_decimal(&dec!(10.0)).unwrap(), vec![0x0A]);
}

#[test]
fn test_varint_decimal_rejects_fraction() {
    let err = encode_varint_decimal(&dec!(1.5)).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_varint_decimal_rejects_negative() {
    let err = encode_varint_decimal(&dec!(-100)).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_decode_varint_known_values() {
    assert_eq!(decode_varint(&[0x0A]).unwrap(), (10, 1));
    assert_eq!(decode_varint(&[0xAC, 0x02]).unwrap(), (300, 2));
    assert_eq!(
        decode_varint(&[0xBF, 0xEA, 0xF3, 0xB9, 0x07]).unwrap(),
        (0x773cf53f, 5)
    );
}

#[test]
fn test_decode_varint_ignores_trailing_bytes() {
    assert_eq!(decode_varint(&[0xAC, 0x02, 0xFF, 0x00]).unwrap(), (300, 2));
}

#[test]
fn test_decode_varint_empty_is_truncated() {
    let err = decode_varint(&[]).unwrap_err();
    assert!(matches!(err, TradewireError::TruncatedMessage { .. }));
}

#[test]
fn test_decode_varint_unterminated_is_truncated() {
    let err = decode_varint(&[0x80, 0x80]).unwrap_err();
    assert!(matches!(err, TradewireError::TruncatedMessage { .. }));
}

#[test]
fn test_decode_varint_too_long() {
    let err = decode_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_decode_varint_above_i32_max() {
    // 2^31 encoded in five bytes
    let err = decode_varint(&[0x80, 0x80, 0x80, 0x80, 0x08]).unwrap_err();
    assert!(matches!(err, TradewireError::InvalidVarint(_)));
}

#[test]
fn test_delimited_layout() {
    let framed = encode_delimited(b"hello").unwrap();
    assert_eq!(framed[0], 5);
    assert_eq!(&framed[1..], b"hello");
}

#[test]
fn test_delimited_round_trip() {
    let payload = vec![0xABu8; 300];
    let framed = encode_delimited(&payload).unwrap();
    assert_eq!(&framed[..2], &[0xAC, 0x02]);

    let (decoded, consumed) = decode_delimited(&framed).unwrap();
    assert_eq!(decoded, payload.as_slice());
    assert_eq!(consumed, framed.len());
}

#[test]
fn test_delimited_empty_payload() {
    let framed = encode_delimited(&[]).unwrap();
    assert_eq!(framed, vec![0x00]);
    let (decoded, consumed) = decode_delimited(&framed).unwrap();
    assert!(decoded.is_empty());
    assert_eq!(consumed, 1);
}

#[test]
fn test_delimited_at_ceiling() {
    let payload = vec![0u8; MAX_PAYLOAD_SIZE];
    let framed = encode_delimited(&payload).unwrap();
    assert_eq!(framed.len(), MAX_PAYLOAD_SIZE + 3);
}

#[test]
fn test_delimited_over_ceiling() {
    let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
    let err = encode_delimited(&payload).unwrap_err();
    match err {
        TradewireError::PayloadTooLarge { size, limit } => {
            assert_eq!(size, 102_401);
            assert_eq!(limit, 102_400);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_decode_delimited_prefix_over_ceiling() {
    let prefix = encode_varint((MAX_PAYLOAD_SIZE + 1) as i64).unwrap();
    let err = decode_delimited(&prefix).unwrap_err();
    assert!(matches!(err, TradewireError::PayloadTooLarge { .. }));
}

#[test]
fn test_decode_delimited_truncated_payload() {
    let err = decode_delimited(&[0x05, b'a', b'b']).unwrap_err();
    match err {
        TradewireError::TruncatedMessage {
            expected,
            available,
        } => {
            assert_eq!(expected, 5);
            assert_eq!(available, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_decode_delimited_leaves_trailing_bytes() {
    let (payload, consumed) = decode_delimited(&[0x02, 0x01, 0x02, 0x03]).unwrap();
    assert_eq!(payload, &[0x01, 0x02]);
    assert_eq!(consumed, 3);
}
