/*
[INPUT]:  Platform and time-range parameters
[OUTPUT]: User account data (balances, transfers, volume, limits)
[POS]:    HTTP layer - account endpoints
[UPDATE]: When adding new user endpoints or changing query parameters
*/

use chrono::{DateTime, FixedOffset};
use reqwest::Method;

use crate::http::{FalconxClient, Result};
use crate::types::{
    Balance, Platform, PlatformQuery, TimeRangeQuery, TotalBalance, TradeLimits, TradeVolume,
    Transfer,
};

impl FalconxClient {
    /// Balances held on one platform
    ///
    /// GET /v1/balances with `{platform}` body
    pub async fn get_balances(&self, platform: Platform) -> Result<Vec<Balance>> {
        let query = PlatformQuery { platform };
        self.execute(Method::GET, "/v1/balances", Some(&query)).await
    }

    /// Balances summed across platforms
    ///
    /// GET /v1/balances/total
    pub async fn get_total_balances(&self) -> Result<Vec<TotalBalance>> {
        self.get("/v1/balances/total").await
    }

    /// Deposits and withdrawals in a time range
    ///
    /// GET /v1/transfers with `{t_start, t_end[, platform]}` body
    pub async fn get_transfers(
        &self,
        t_start: DateTime<FixedOffset>,
        t_end: DateTime<FixedOffset>,
        platform: Option<Platform>,
    ) -> Result<Vec<Transfer>> {
        let query = TimeRangeQuery {
            t_start,
            t_end,
            platform,
        };
        self.execute(Method::GET, "/v1/transfers", Some(&query)).await
    }

    /// USD volume traded through the API in a time range
    ///
    /// GET /v1/get_trade_volume with `{t_start, t_end, platform: "api"}` body
    pub async fn get_trade_volume(
        &self,
        t_start: DateTime<FixedOffset>,
        t_end: DateTime<FixedOffset>,
    ) -> Result<TradeVolume> {
        let query = TimeRangeQuery {
            t_start,
            t_end,
            platform: Some(Platform::Api),
        };
        self.execute(Method::GET, "/v1/get_trade_volume", Some(&query))
            .await
    }

    /// Gross and net trade limits for a platform
    ///
    /// GET /v1/get_trade_limits/{platform}
    pub async fn get_trade_limits(&self, platform: Platform) -> Result<TradeLimits> {
        let endpoint = format!("/v1/get_trade_limits/{platform}");
        self.get(&endpoint).await
    }
}
