/*
[INPUT]:  Quote and order requests
[OUTPUT]: Quote, execution and order responses
[POS]:    HTTP layer - trading endpoints
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use chrono::{DateTime, FixedOffset};
use reqwest::Method;

use crate::http::{FalconxClient, Result};
use crate::types::{
    OrderRequest, OrderRequestV3, OrderResponse, OrderResponseV3, Platform, QuoteExecutionRequest,
    QuoteRequest, QuoteResponse, TimeRangeQuery,
};

impl FalconxClient {
    /// Request a two-way, buy or sell quote for a token pair
    ///
    /// POST /v1/quotes
    pub async fn get_quote(&self, req: &QuoteRequest) -> Result<QuoteResponse> {
        self.execute(Method::POST, "/v1/quotes", Some(req)).await
    }

    /// Check the status of a quote already requested
    ///
    /// GET /v1/quotes/{fx_quote_id}
    pub async fn get_quote_status(&self, fx_quote_id: &str) -> Result<QuoteResponse> {
        let endpoint = format!("/v1/quotes/{fx_quote_id}");
        self.get(&endpoint).await
    }

    /// Execute a previously requested quote
    ///
    /// POST /v1/quotes/execute
    pub async fn execute_quote(&self, req: &QuoteExecutionRequest) -> Result<QuoteResponse> {
        self.execute(Method::POST, "/v1/quotes/execute", Some(req))
            .await
    }

    /// Executed quotes in a time range, optionally restricted to one platform
    ///
    /// GET /v1/quotes with `{t_start, t_end[, platform]}` body
    pub async fn get_executed_quotes(
        &self,
        t_start: DateTime<FixedOffset>,
        t_end: DateTime<FixedOffset>,
        platform: Option<Platform>,
    ) -> Result<Vec<QuoteResponse>> {
        let query = TimeRangeQuery {
            t_start,
            t_end,
            platform,
        };
        self.execute(Method::GET, "/v1/quotes", Some(&query)).await
    }

    /// Place a market or limit order
    ///
    /// POST /v1/order
    pub async fn place_order(&self, req: &OrderRequest) -> Result<OrderResponse> {
        self.execute(Method::POST, "/v1/order", Some(req)).await
    }

    /// Place an order through the v3 schema
    ///
    /// POST /v3/order
    pub async fn place_order_v3(&self, req: &OrderRequestV3) -> Result<OrderResponseV3> {
        self.execute(Method::POST, "/v3/order", Some(req)).await
    }
}
