/// Receipt decoding and classification.
///
/// A receipt either carries the success variant matching the sent action kind
/// or an error code. Any other variant means the client and backend disagree
/// on the protocol and is always fatal.
use log::debug;
use prost::Message;

use crate::encoding::decode_delimited;
use crate::errors::{RemoteErrorCode, TradewireError};
use crate::models::*;
use crate::proto;

pub struct ReceiptDecoder;

impl ReceiptDecoder {
    /// Decode a framed response body (`varint(len) + receipt`) and classify it.
    pub fn decode(expected: ActionKindTag, body: &[u8]) -> Result<ActionResult, TradewireError> {
        let (payload, consumed) = decode_delimited(body)?;
        if consumed != body.len() {
            return Err(TradewireError::MalformedReceipt(format!(
                "{} trailing bytes after receipt frame",
                body.len() - consumed
            )));
        }
        let receipt = proto::Receipt::decode(payload)?;
        Self::classify(expected, receipt)
    }

    /// Map a receipt to the success result for `expected`, or to a typed error.
    pub fn classify(
        expected: ActionKindTag,
        receipt: proto::Receipt,
    ) -> Result<ActionResult, TradewireError> {
        let result = receipt.result.ok_or_else(|| TradewireError::UnexpectedReceiptKind {
            expected,
            received: "empty receipt".into(),
        })?;
        debug!(
            "receipt.classify expected={} received={}",
            expected,
            result.variant_name()
        );

        let received = result.variant_name();
        let action_result = match result {
            proto::ReceiptResult::Err(err) => return Err(rejection(err)),
            proto::ReceiptResult::CreateSession(r) => {
                ActionResult::CreateSession(CreateSessionResult {
                    session_id: r.session_id,
                    expiry_timestamp: r.expiry_timestamp,
                })
            }
            proto::ReceiptResult::RevokeSession(r) => {
                ActionResult::RevokeSession(RevokeSessionResult {
                    session_id: r.session_id,
                })
            }
            proto::ReceiptResult::Withdraw(r) => {
                ActionResult::Withdraw(WithdrawResult { amount: r.amount })
            }
            proto::ReceiptResult::PlaceOrder(r) => ActionResult::PlaceOrder(PlaceOrderResult {
                posted: r.posted.map(|p| PostedOrder {
                    order_id: p.order_id,
                }),
            }),
            proto::ReceiptResult::CancelOrderById(r) => {
                ActionResult::CancelOrderById(CancelOrderResult {
                    order_id: r.order_id,
                })
            }
        };

        if action_result.tag() != expected {
            return Err(TradewireError::UnexpectedReceiptKind {
                expected,
                received: received.into(),
            });
        }
        Ok(action_result)
    }
}

fn rejection(err: proto::ReceiptError) -> TradewireError {
    let code = RemoteErrorCode::from_code(err.code);
    let reason = if err.message.is_empty() {
        code.description().to_string()
    } else {
        err.message
    };
    TradewireError::ActionRejected { code, reason }
}
