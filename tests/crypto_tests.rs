/// Unit tests for the crypto and signer modules.
///
/// Tests key generation, per-scheme sign/verify, identity key rules,
/// wallet personal-sign, and the two signing conventions.
use tradewire_sdk::crypto::*;
use tradewire_sdk::signer::*;
use tradewire_sdk::{ActionKindTag, TradewireError};

#[test]
fn test_public_key_lengths() {
    let ed = SigningKey::generate(KeyType::Ed25519).unwrap();
    assert_eq!(ed.public_key_bytes().len(), ED25519_PUBKEY_LEN);

    let secp = SigningKey::generate(KeyType::Secp256k1).unwrap();
    assert_eq!(secp.public_key_bytes().len(), SECP256K1_PUBKEY_LEN);
    assert!(matches!(secp.public_key_bytes()[0], 0x02 | 0x03));

    let bls = SigningKey::generate(KeyType::Bls12_381).unwrap();
    assert_eq!(bls.public_key_bytes().len(), BLS_PUBKEY_LEN);
}

#[test]
fn test_ed25519_sign_verify() {
    let key = SigningKey::generate(KeyType::Ed25519).unwrap();
    let sig = key.sign_raw(b"place order");
    assert_eq!(sig.len(), 64);

    let pk = key.public_key_bytes();
    assert!(verify_raw(KeyType::Ed25519, &pk, b"place order", &sig).unwrap());
    assert!(!verify_raw(KeyType::Ed25519, &pk, b"other message", &sig).unwrap());
}

#[test]
fn test_ed25519_deterministic() {
    let key = SigningKey::from_bytes(KeyType::Ed25519, &[0x11u8; 32]).unwrap();
    assert_eq!(key.sign_raw(b"msg"), key.sign_raw(b"msg"));
}

#[test]
fn test_secp256k1_sign_verify() {
    let key = SigningKey::generate(KeyType::Secp256k1).unwrap();
    let sig = key.sign_raw(b"withdraw");
    assert_eq!(sig.len(), 64);

    let pk = key.public_key_bytes();
    assert!(verify_raw(KeyType::Secp256k1, &pk, b"withdraw", &sig).unwrap());
    assert!(!verify_raw(KeyType::Secp256k1, &pk, b"withdraw!", &sig).unwrap());
}

#[test]
fn test_secp256k1_low_s() {
    // Low-s: the high bit of s (byte 32) is never set.
    let key = SigningKey::from_bytes(KeyType::Secp256k1, &[0x01u8; 32]).unwrap();
    for i in 0u8..20 {
        let sig = key.sign_raw(&[i]);
        assert_eq!(sig[32] & 0x80, 0, "high s for message {i}");
    }
}

#[test]
fn test_bls_sign_verify() {
    let key = SigningKey::generate(KeyType::Bls12_381).unwrap();
    let sig = key.sign_raw(b"aggregate me");
    assert_eq!(sig.len(), 96);

    let pk = key.public_key_bytes();
    assert!(verify_raw(KeyType::Bls12_381, &pk, b"aggregate me", &sig).unwrap());
    assert!(!verify_raw(KeyType::Bls12_381, &pk, b"something else", &sig).unwrap());
}

#[test]
fn test_verify_rejects_malformed_key() {
    let err = verify_raw(KeyType::Ed25519, &[0u8; 31], b"m", &[0u8; 64]).unwrap_err();
    assert!(matches!(err, TradewireError::CryptoError(_)));
}

#[test]
fn test_bls_cannot_be_identity() {
    let key = SigningKey::generate(KeyType::Bls12_381).unwrap();
    let err = key.public_key().unwrap_err();
    assert!(matches!(
        err,
        TradewireError::UnsupportedKeyType {
            key_type: KeyType::Bls12_381,
            ..
        }
    ));

    assert!(PublicKey::new(KeyType::Bls12_381, vec![0u8; 48]).is_err());
    assert!(SessionKey::generate(KeyType::Bls12_381).is_err());
}

#[test]
fn test_public_key_length_checked() {
    assert!(PublicKey::new(KeyType::Ed25519, vec![0u8; 32]).is_ok());
    let err = PublicKey::new(KeyType::Ed25519, vec![0u8; 33]).unwrap_err();
    assert!(matches!(err, TradewireError::Validation { field: "public_key", .. }));
    assert!(PublicKey::new(KeyType::Secp256k1, vec![0u8; 32]).is_err());
}

#[test]
fn test_public_key_from_hex() {
    let hex = format!("0x{}", "ab".repeat(32));
    let key = PublicKey::from_hex(KeyType::Ed25519, &hex).unwrap();
    assert_eq!(key.as_bytes(), &[0xABu8; 32]);
}

#[test]
fn test_wallet_deterministic() {
    let w1 = LocalWallet::from_private_key(&[0x01u8; 32]).unwrap();
    let w2 = LocalWallet::from_hex(&format!("0x{}", "01".repeat(32))).unwrap();
    assert_eq!(w1.public_key(), w2.public_key());
    assert_eq!(w1.evm_address(), w2.evm_address());
    assert_eq!(w1.public_key().key_type(), KeyType::Secp256k1);
}

#[test]
fn test_personal_sign_65_bytes() {
    let wallet = LocalWallet::generate().unwrap();
    let sig = wallet.personal_sign(b"create session");
    assert_eq!(sig.len(), 65);
    assert!(sig[64] == 27 || sig[64] == 28);
}

#[test]
fn test_personal_signature_verifies_after_strip() {
    let wallet = LocalWallet::generate().unwrap();
    let sig = wallet.personal_sign(b"revoke session");
    assert!(verify_personal_signature(wallet.public_key(), b"revoke session", &sig[..64]).unwrap());
    assert!(!verify_personal_signature(wallet.public_key(), b"tampered", &sig[..64]).unwrap());
}

#[test]
fn test_personal_sign_digest_prefix() {
    // keccak256("\x19Ethereum Signed Message:\n0")
    let digest = personal_sign_digest(b"");
    assert_eq!(
        hex::encode(digest),
        "5f35dce98ba4fba25530a026ed80b2cecdaa31091ba4958b99b52ea1d068adad"
    );
}

#[test]
fn test_decode_wallet_signature_strips_recovery_byte() {
    let mut raw = vec![0x11u8; 64];
    raw.push(0x1B);
    let sig = decode_wallet_signature(&to_hex_string(&raw)).unwrap();
    assert_eq!(sig, vec![0x11u8; 64]);
}

#[test]
fn test_decode_wallet_signature_requires_65_bytes() {
    let err = decode_wallet_signature(&to_hex_string(&[0u8; 64])).unwrap_err();
    assert!(matches!(err, TradewireError::CryptoError(_)));
    assert!(decode_wallet_signature("0xzz").is_err());
}

#[test]
fn test_signing_convention_by_kind() {
    assert_eq!(
        SigningConvention::for_kind(ActionKindTag::CreateSession),
        SigningConvention::Wallet
    );
    assert_eq!(
        SigningConvention::for_kind(ActionKindTag::RevokeSession),
        SigningConvention::Wallet
    );
    assert_eq!(
        SigningConvention::for_kind(ActionKindTag::Withdraw),
        SigningConvention::Session
    );
    assert_eq!(
        SigningConvention::for_kind(ActionKindTag::PlaceOrder),
        SigningConvention::Session
    );
    assert_eq!(
        SigningConvention::for_kind(ActionKindTag::CancelOrderById),
        SigningConvention::Session
    );
}

#[tokio::test]
async fn test_action_signer_wallet_convention() {
    let wallet = LocalWallet::generate().unwrap();
    let signer = ActionSigner::Wallet(&wallet);
    let sig = signer
        .sign(ActionKindTag::CreateSession, b"envelope")
        .await
        .unwrap();
    assert_eq!(sig.len(), SIGNATURE_LEN);
    assert!(verify_personal_signature(wallet.public_key(), b"envelope", &sig).unwrap());
}

#[tokio::test]
async fn test_action_signer_session_convention() {
    let session = SessionKey::generate(KeyType::Ed25519).unwrap();
    let signer = ActionSigner::Session(&session);
    let sig = signer
        .sign(ActionKindTag::PlaceOrder, b"envelope")
        .await
        .unwrap();
    assert_eq!(sig.len(), SIGNATURE_LEN);

    let pk = SessionSigner::public_key(&session);
    assert!(verify_raw(KeyType::Ed25519, pk.as_bytes(), b"envelope", &sig).unwrap());
}

#[tokio::test]
async fn test_action_signer_rejects_wrong_convention() {
    let session = SessionKey::generate(KeyType::Secp256k1).unwrap();
    let err = ActionSigner::Session(&session)
        .sign(ActionKindTag::CreateSession, b"envelope")
        .await
        .unwrap_err();
    assert!(matches!(err, TradewireError::Validation { field: "signer", .. }));

    let wallet = LocalWallet::generate().unwrap();
    let err = ActionSigner::Wallet(&wallet)
        .sign(ActionKindTag::Withdraw, b"envelope")
        .await
        .unwrap_err();
    assert!(matches!(err, TradewireError::Validation { field: "signer", .. }));
}
