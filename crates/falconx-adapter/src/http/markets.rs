/*
[INPUT]:  None beyond credentials
[OUTPUT]: Tradable pairs and per-pair size limits
[POS]:    HTTP layer - market reference endpoints
[UPDATE]: When adding new reference endpoints
*/

use crate::http::{FalconxClient, Result};
use crate::types::{TokenPair, TradeSize};

impl FalconxClient {
    /// Token pairs the account is eligible to trade
    ///
    /// GET /v1/pairs
    pub async fn get_trading_pairs(&self) -> Result<Vec<TokenPair>> {
        self.get("/v1/pairs").await
    }

    /// Minimum and maximum trade size per pair, in quote token
    ///
    /// GET /v1/trade_sizes
    pub async fn get_trade_sizes(&self) -> Result<Vec<TradeSize>> {
        self.get("/v1/trade_sizes").await
    }
}
