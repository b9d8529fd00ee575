/// Unit tests for receipt decoding and classification.
use prost::Message;
use tradewire_sdk::encoding::encode_delimited;
use tradewire_sdk::proto;
use tradewire_sdk::*;

fn framed(result: Option<proto::ReceiptResult>) -> Vec<u8> {
    let body = proto::Receipt { result }.encode_to_vec();
    encode_delimited(&body).unwrap()
}

#[test]
fn test_decode_place_order_posted() {
    let body = framed(Some(proto::ReceiptResult::PlaceOrder(proto::PlaceOrderResult {
        posted: Some(proto::PostedOrder { order_id: 88 }),
    })));
    let result = ReceiptDecoder::decode(ActionKindTag::PlaceOrder, &body).unwrap();
    assert_eq!(
        result,
        ActionResult::PlaceOrder(PlaceOrderResult {
            posted: Some(PostedOrder { order_id: 88 })
        })
    );
}

#[test]
fn test_decode_place_order_not_posted() {
    let body = framed(Some(proto::ReceiptResult::PlaceOrder(
        proto::PlaceOrderResult { posted: None },
    )));
    let result = ReceiptDecoder::decode(ActionKindTag::PlaceOrder, &body).unwrap();
    assert_eq!(result, ActionResult::PlaceOrder(PlaceOrderResult { posted: None }));
}

#[test]
fn test_decode_create_session() {
    let body = framed(Some(proto::ReceiptResult::CreateSession(
        proto::CreateSessionResult {
            session_id: 5,
            expiry_timestamp: 1_700_604_800,
        },
    )));
    let result = ReceiptDecoder::decode(ActionKindTag::CreateSession, &body).unwrap();
    assert_eq!(
        result,
        ActionResult::CreateSession(CreateSessionResult {
            session_id: 5,
            expiry_timestamp: 1_700_604_800
        })
    );
}

#[test]
fn test_mismatched_kind_is_protocol_error() {
    let body = framed(Some(proto::ReceiptResult::Withdraw(proto::WithdrawResult {
        amount: 10,
    })));
    let err = ReceiptDecoder::decode(ActionKindTag::PlaceOrder, &body).unwrap_err();
    match &err {
        TradewireError::UnexpectedReceiptKind { expected, received } => {
            assert_eq!(*expected, ActionKindTag::PlaceOrder);
            assert_eq!(received, "Withdraw");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.class(), ErrorClass::Protocol);
    assert!(!err.is_retryable());
}

#[test]
fn test_empty_receipt_is_protocol_error() {
    let err = ReceiptDecoder::decode(ActionKindTag::Withdraw, &framed(None)).unwrap_err();
    assert!(matches!(err, TradewireError::UnexpectedReceiptKind { .. }));
}

#[test]
fn test_error_receipt_is_rejection() {
    let body = framed(Some(proto::ReceiptResult::Err(proto::ReceiptError {
        code: 1,
        message: "bad signature".into(),
    })));
    let err = ReceiptDecoder::decode(ActionKindTag::CancelOrderById, &body).unwrap_err();
    assert_eq!(err.remote_code(), Some(RemoteErrorCode::SignatureVerification));
    assert_eq!(err.class(), ErrorClass::Rejected);
    let message = err.to_string();
    assert!(message.contains("SIGNATURE_VERIFICATION"), "{message}");
    assert!(message.contains("bad signature"), "{message}");
}

#[test]
fn test_error_receipt_without_message_uses_description() {
    let body = framed(Some(proto::ReceiptResult::Err(proto::ReceiptError {
        code: 2,
        message: String::new(),
    })));
    let err = ReceiptDecoder::decode(ActionKindTag::Withdraw, &body).unwrap_err();
    match err {
        TradewireError::ActionRejected { code, reason } => {
            assert_eq!(code, RemoteErrorCode::InsufficientBalance);
            assert_eq!(reason, RemoteErrorCode::InsufficientBalance.description());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_remote_code_preserved() {
    let body = framed(Some(proto::ReceiptResult::Err(proto::ReceiptError {
        code: 999,
        message: "new failure".into(),
    })));
    let err = ReceiptDecoder::decode(ActionKindTag::Withdraw, &body).unwrap_err();
    let code = err.remote_code().unwrap();
    assert_eq!(code.code(), 999);
    assert!(err.to_string().contains("999"));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut body = framed(Some(proto::ReceiptResult::RevokeSession(
        proto::RevokeSessionResult { session_id: 1 },
    )));
    body.push(0x00);
    let err = ReceiptDecoder::decode(ActionKindTag::RevokeSession, &body).unwrap_err();
    assert!(matches!(err, TradewireError::MalformedReceipt(_)));
}

#[test]
fn test_truncated_frame() {
    let body = framed(Some(proto::ReceiptResult::CancelOrderById(
        proto::CancelOrderByIdResult { order_id: 77 },
    )));
    let err = ReceiptDecoder::decode(ActionKindTag::CancelOrderById, &body[..body.len() - 1])
        .unwrap_err();
    assert!(matches!(err, TradewireError::TruncatedMessage { .. }));
}

#[test]
fn test_garbage_payload_is_malformed() {
    let body = encode_delimited(&[0xFF, 0xFF, 0xFF]).unwrap();
    let err = ReceiptDecoder::decode(ActionKindTag::Withdraw, &body).unwrap_err();
    assert!(matches!(err, TradewireError::MalformedReceipt(_)));
}
