/// High-level action sender that orchestrates the full pipeline.
///
/// Every action goes through the same sequence:
/// build envelope -> frame -> sign -> transport -> decode receipt.
///
/// Nothing is retried. A failed or rejected action is final; to try again,
/// call the method again so that a new envelope with a fresh timestamp and
/// nonce is built. Resending identical bytes risks a duplicate intent.
use log::debug;
use rust_decimal::Decimal;

use crate::action::ActionBuilder;
use crate::config::NetworkConfig;
use crate::crypto::PublicKey;
use crate::encoding::encode_delimited;
use crate::errors::TradewireError;
use crate::metadata::MetadataProvider;
use crate::models::*;
use crate::nonce::{Clock, NonceAllocator, SystemClock};
use crate::receipt::ReceiptDecoder;
use crate::signer::{ActionSigner, SessionSigner, WalletSigner};
use crate::transport::{HttpTransport, Transport};

/// A wallet identity together with its own nonce state.
pub struct WalletAccount<W: WalletSigner, C: Clock = SystemClock> {
    signer: W,
    nonces: NonceAllocator<C>,
}

impl<W: WalletSigner> WalletAccount<W> {
    pub fn new(signer: W) -> Self {
        Self::with_clock(signer, SystemClock)
    }
}

impl<W: WalletSigner, C: Clock> WalletAccount<W, C> {
    pub fn with_clock(signer: W, clock: C) -> Self {
        Self {
            signer,
            nonces: NonceAllocator::with_clock(clock),
        }
    }

    pub fn signer(&self) -> &W {
        &self.signer
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn nonces(&self) -> &NonceAllocator<C> {
        &self.nonces
    }
}

/// A trading session: its backend id, expiry, session key and nonce state.
///
/// To share one session between tasks, wrap it in a `tokio::sync::Mutex` and
/// hold the lock for the whole call.
pub struct TradingSession<S: SessionSigner, C: Clock = SystemClock> {
    session_id: SessionId,
    expiry_timestamp: i64,
    signer: S,
    nonces: NonceAllocator<C>,
}

impl<S: SessionSigner> TradingSession<S> {
    pub fn new(session_id: SessionId, expiry_timestamp: i64, signer: S) -> Self {
        Self::with_clock(session_id, expiry_timestamp, signer, SystemClock)
    }
}

impl<S: SessionSigner, C: Clock> TradingSession<S, C> {
    pub fn with_clock(session_id: SessionId, expiry_timestamp: i64, signer: S, clock: C) -> Self {
        Self {
            session_id,
            expiry_timestamp,
            signer,
            nonces: NonceAllocator::with_clock(clock),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn expiry_timestamp(&self) -> i64 {
        self.expiry_timestamp
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn nonces(&self) -> &NonceAllocator<C> {
        &self.nonces
    }

    pub fn is_expired(&self) -> bool {
        self.nonces.clock().now_secs() >= self.expiry_timestamp
    }

    fn check_expiry(&self) -> Result<(), TradewireError> {
        if self.is_expired() {
            return Err(TradewireError::SessionExpired(format!(
                "Session {} expired at {}. Create a new session before submitting actions.",
                self.session_id, self.expiry_timestamp
            )));
        }
        Ok(())
    }
}

/// Builds, signs and sends actions, and decodes their receipts.
pub struct ActionSender<T: Transport, M: MetadataProvider> {
    transport: T,
    metadata: M,
    config: NetworkConfig,
}

impl<M: MetadataProvider> ActionSender<HttpTransport, M> {
    /// Create a sender that posts over HTTP to `config.endpoint`.
    pub fn connect(config: NetworkConfig, metadata: M) -> Result<Self, TradewireError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport, metadata))
    }
}

impl<T: Transport, M: MetadataProvider> ActionSender<T, M> {
    pub fn new(config: NetworkConfig, transport: T, metadata: M) -> Self {
        Self {
            transport,
            metadata,
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Frame, sign, send and classify one built envelope.
    ///
    /// The request body is `varint(len(envelope)) + envelope + signature`,
    /// where the signature covers the framed bytes that precede it.
    pub async fn submit(
        &self,
        envelope: &ActionEnvelope,
        signer: ActionSigner<'_>,
    ) -> Result<ActionResult, TradewireError> {
        let kind = envelope.kind_tag();
        let body = envelope.encode();
        let mut request = encode_delimited(&body)?;
        let signature = signer.sign(kind, &request).await?;
        request.extend_from_slice(&signature);

        debug!(
            "sender.submit kind={} nonce={} body_len={} request_len={}",
            kind,
            envelope.nonce(),
            body.len(),
            request.len()
        );

        let response = self.transport.send(request).await.map_err(|e| match e {
            TradewireError::Transport(_) => e,
            other => TradewireError::Transport(other.to_string()),
        })?;

        ReceiptDecoder::decode(kind, &response)
    }

    // -----------------------------------------------------------------------
    // Wallet-signed actions
    // -----------------------------------------------------------------------

    /// Register `session_pubkey` as a session of the wallet's account.
    ///
    /// `expiry_timestamp` defaults to now + the configured session TTL.
    pub async fn create_session<W: WalletSigner, C: Clock>(
        &self,
        wallet: &mut WalletAccount<W, C>,
        session_pubkey: PublicKey,
        expiry_timestamp: Option<i64>,
    ) -> Result<CreateSessionResult, TradewireError> {
        let builder = ActionBuilder::new(wallet.nonces.next_stamp());
        let envelope = builder.create_session(
            wallet.signer.public_key(),
            session_pubkey,
            expiry_timestamp,
            self.config.session_ttl,
        )?;
        match self
            .submit(&envelope, ActionSigner::Wallet(&wallet.signer))
            .await?
        {
            ActionResult::CreateSession(result) => Ok(result),
            other => Err(unexpected(ActionKindTag::CreateSession, &other)),
        }
    }

    /// Create a session for `session_signer` and return a ready [`TradingSession`].
    ///
    /// The session gets its own nonce allocator on the wallet's clock.
    pub async fn open_session<W, S, C>(
        &self,
        wallet: &mut WalletAccount<W, C>,
        session_signer: S,
        expiry_timestamp: Option<i64>,
    ) -> Result<TradingSession<S, C>, TradewireError>
    where
        W: WalletSigner,
        S: SessionSigner,
        C: Clock + Clone,
    {
        let created = self
            .create_session(wallet, session_signer.public_key(), expiry_timestamp)
            .await?;
        Ok(TradingSession::with_clock(
            created.session_id,
            created.expiry_timestamp,
            session_signer,
            wallet.nonces.clock().clone(),
        ))
    }

    pub async fn revoke_session<W: WalletSigner, C: Clock>(
        &self,
        wallet: &mut WalletAccount<W, C>,
        session_id: SessionId,
    ) -> Result<RevokeSessionResult, TradewireError> {
        let envelope = ActionBuilder::new(wallet.nonces.next_stamp()).revoke_session(session_id);
        match self
            .submit(&envelope, ActionSigner::Wallet(&wallet.signer))
            .await?
        {
            ActionResult::RevokeSession(result) => Ok(result),
            other => Err(unexpected(ActionKindTag::RevokeSession, &other)),
        }
    }

    // -----------------------------------------------------------------------
    // Session-signed actions
    // -----------------------------------------------------------------------

    /// Withdraw `amount` (human units) of `token_id`.
    pub async fn withdraw<S: SessionSigner, C: Clock>(
        &self,
        session: &mut TradingSession<S, C>,
        token_id: TokenId,
        amount: Decimal,
    ) -> Result<WithdrawResult, TradewireError> {
        session.check_expiry()?;
        let decimals = self.metadata.token_decimals(token_id)?;
        let envelope = ActionBuilder::new(session.nonces.next_stamp()).withdraw(
            session.session_id,
            token_id,
            &amount,
            decimals,
        )?;
        match self
            .submit(&envelope, ActionSigner::Session(&session.signer))
            .await?
        {
            ActionResult::Withdraw(result) => Ok(result),
            other => Err(unexpected(ActionKindTag::Withdraw, &other)),
        }
    }

    /// Place an order.
    pub async fn place_order<S: SessionSigner, C: Clock>(
        &self,
        session: &mut TradingSession<S, C>,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResult, TradewireError> {
        session.check_expiry()?;
        let scale = self.metadata.market_scale(request.market_id)?;
        let envelope = ActionBuilder::new(session.nonces.next_stamp()).place_order(
            session.session_id,
            request,
            scale,
        )?;
        match self
            .submit(&envelope, ActionSigner::Session(&session.signer))
            .await?
        {
            ActionResult::PlaceOrder(result) => Ok(result),
            other => Err(unexpected(ActionKindTag::PlaceOrder, &other)),
        }
    }

    /// Cancel an order by id.
    pub async fn cancel_order<S: SessionSigner, C: Clock>(
        &self,
        session: &mut TradingSession<S, C>,
        request: &CancelOrderRequest,
    ) -> Result<CancelOrderResult, TradewireError> {
        session.check_expiry()?;
        let envelope =
            ActionBuilder::new(session.nonces.next_stamp()).cancel_order(session.session_id, request);
        match self
            .submit(&envelope, ActionSigner::Session(&session.signer))
            .await?
        {
            ActionResult::CancelOrderById(result) => Ok(result),
            other => Err(unexpected(ActionKindTag::CancelOrderById, &other)),
        }
    }
}

fn unexpected(expected: ActionKindTag, received: &ActionResult) -> TradewireError {
    TradewireError::UnexpectedReceiptKind {
        expected,
        received: received.tag().to_string(),
    }
}
