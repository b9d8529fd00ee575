/// Token and market decimals used to scale amounts, prices and sizes.
///
/// Fetching metadata from the backend is the caller's concern; the sender only
/// needs a synchronous lookup over data already loaded.
use std::collections::HashMap;

use crate::action::MarketScale;
use crate::errors::TradewireError;
use crate::models::{MarketId, TokenId};

/// Supplies per-token and per-market decimals.
pub trait MetadataProvider: Send + Sync {
    fn token_decimals(&self, token_id: TokenId) -> Result<u32, TradewireError>;
    fn market_scale(&self, market_id: MarketId) -> Result<MarketScale, TradewireError>;
}

/// In-memory metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    tokens: HashMap<TokenId, u32>,
    markets: HashMap<MarketId, MarketScale>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token_id: TokenId, decimals: u32) -> Self {
        self.tokens.insert(token_id, decimals);
        self
    }

    pub fn with_market(mut self, market_id: MarketId, price_decimals: u32, size_decimals: u32) -> Self {
        self.markets.insert(
            market_id,
            MarketScale {
                price_decimals,
                size_decimals,
            },
        );
        self
    }
}

impl MetadataProvider for StaticMetadata {
    fn token_decimals(&self, token_id: TokenId) -> Result<u32, TradewireError> {
        self.tokens
            .get(&token_id)
            .copied()
            .ok_or_else(|| TradewireError::validation("token_id", format!("unknown token {token_id}")))
    }

    fn market_scale(&self, market_id: MarketId) -> Result<MarketScale, TradewireError> {
        self.markets.get(&market_id).copied().ok_or_else(|| {
            TradewireError::validation("market_id", format!("unknown market {market_id}"))
        })
    }
}
