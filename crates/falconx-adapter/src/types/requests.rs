/*
[INPUT]:  Caller parameters for quote, order and account queries
[OUTPUT]: Serializable request bodies
[POS]:    Data layer - request body definitions
[UPDATE]: When API request schema changes
*/

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderType, Platform, QuoteSide, Side, TimeInForce};
use super::models::{Quantity, TokenPair};
use super::serde_helpers;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub token_pair: TokenPair,
    pub quantity: Quantity,
    pub side: QuoteSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteExecutionRequest {
    pub fx_quote_id: String,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub token_pair: TokenPair,
    pub quantity: Quantity,
    pub side: Side,
    pub order_type: OrderType,
    /// Only required for limit orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Only required for limit orders
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_helpers::serialize_decimal_option_as_number",
        deserialize_with = "serde_helpers::deserialize_decimal_option"
    )]
    pub limit_price: Option<Decimal>,
    /// Only valid for fok limit orders
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_helpers::serialize_decimal_option_as_number",
        deserialize_with = "serde_helpers::deserialize_decimal_option"
    )]
    pub slippage_bps: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    pub fn market(token_pair: TokenPair, quantity: Quantity, side: Side) -> Self {
        Self {
            token_pair,
            quantity,
            side,
            order_type: OrderType::Market,
            time_in_force: None,
            limit_price: None,
            slippage_bps: None,
            client_order_id: None,
        }
    }

    pub fn limit(
        token_pair: TokenPair,
        quantity: Quantity,
        side: Side,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            token_pair,
            quantity,
            side,
            order_type: OrderType::Limit,
            time_in_force: Some(time_in_force),
            limit_price: Some(limit_price),
            slippage_bps: None,
            client_order_id: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: Decimal) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }
}

/// Body for the v3 order endpoint. The quantity is a bare decimal string and
/// the token it is denominated in travels separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequestV3 {
    pub token_pair: TokenPair,
    #[serde(
        serialize_with = "serde_helpers::serialize_decimal",
        deserialize_with = "serde_helpers::deserialize_decimal"
    )]
    pub quantity: Decimal,
    pub quantity_token: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_helpers::serialize_decimal_option",
        deserialize_with = "serde_helpers::deserialize_decimal_option"
    )]
    pub limit_price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_helpers::serialize_decimal_option",
        deserialize_with = "serde_helpers::deserialize_decimal_option"
    )]
    pub slippage_bps: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

/// Time window (plus optional platform) sent with history queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRangeQuery {
    #[serde(serialize_with = "serde_helpers::serialize_rfc3339")]
    pub t_start: DateTime<FixedOffset>,
    #[serde(serialize_with = "serde_helpers::serialize_rfc3339")]
    pub t_end: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformQuery {
    pub platform: Platform,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_limit_order_body() {
        let order = OrderRequest::limit(
            TokenPair::new("BTC", "USD"),
            Quantity::new("BTC", "0.001".parse().unwrap()),
            Side::Buy,
            "8547.11".parse().unwrap(),
            TimeInForce::Fok,
        )
        .with_slippage_bps(Decimal::from(5))
        .with_client_order_id("Bazinga");

        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({
                "token_pair": {"base_token": "BTC", "quote_token": "USD"},
                "quantity": {"token": "BTC", "value": "0.001"},
                "side": "buy",
                "order_type": "limit",
                "time_in_force": "fok",
                "limit_price": 8547.11,
                "slippage_bps": 5.0,
                "client_order_id": "Bazinga"
            })
        );
    }

    #[test]
    fn test_market_order_omits_limit_fields() {
        let order = OrderRequest::market(
            TokenPair::new("ETH", "USD"),
            Quantity::new("ETH", Decimal::ONE),
            Side::Sell,
        );
        let body = serde_json::to_value(&order).unwrap();
        assert!(body.get("limit_price").is_none());
        assert!(body.get("time_in_force").is_none());
    }

    #[test]
    fn test_time_range_query_format() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let query = TimeRangeQuery {
            t_start: utc.with_ymd_and_hms(2019, 7, 2, 22, 6, 24).unwrap(),
            t_end: utc.with_ymd_and_hms(2019, 7, 3, 22, 6, 24).unwrap(),
            platform: Some(Platform::Api),
        };
        assert_eq!(
            serde_json::to_string(&query).unwrap(),
            r#"{"t_start":"2019-07-02T22:06:24+00:00","t_end":"2019-07-03T22:06:24+00:00","platform":"api"}"#
        );
    }
}
