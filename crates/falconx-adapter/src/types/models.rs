/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderType, Platform, QuoteSide, Side, TimeInForce, TransferType};
use super::serde_helpers;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub base_token: String,
    pub quote_token: String,
}

impl TokenPair {
    pub fn new(base_token: impl Into<String>, quote_token: impl Into<String>) -> Self {
        Self {
            base_token: base_token.into(),
            quote_token: quote_token.into(),
        }
    }
}

/// Amount denominated in `token`; the value travels as a decimal string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub token: String,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub value: Decimal,
}

impl Quantity {
    pub fn new(token: impl Into<String>, value: Decimal) -> Self {
        Self {
            token: token.into(),
            value,
        }
    }
}

/// Error object embedded in a quote or order response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiWarning {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub side: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub status: String,
    pub fx_quote_id: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub buy_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub sell_price: Option<Decimal>,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub token_pair: TokenPair,
    pub quantity_requested: Quantity,
    #[serde(default)]
    pub position_in: Option<Quantity>,
    #[serde(default)]
    pub position_out: Option<Quantity>,
    #[serde(default)]
    pub side_requested: Option<QuoteSide>,
    #[serde(default)]
    pub t_quote: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub t_expiry: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub t_execute: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(default)]
    pub side_executed: Option<Side>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub price_executed: Option<Decimal>,
    #[serde(default)]
    pub trader_email: Option<String>,
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub warnings: Vec<ApiWarning>,
    #[serde(default)]
    pub client_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub status: String,
    pub fx_quote_id: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub buy_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub sell_price: Option<Decimal>,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub token_pair: TokenPair,
    pub quantity_requested: Quantity,
    #[serde(default)]
    pub side_requested: Option<QuoteSide>,
    #[serde(default)]
    pub t_quote: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub t_expiry: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub t_execute: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub gross_fee_bps: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub gross_fee_usd: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub rebate_bps: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub rebate_usd: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub fee_bps: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub fee_usd: Option<Decimal>,
    #[serde(default)]
    pub side_executed: Option<Side>,
    #[serde(default)]
    pub trader_email: Option<String>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub limit_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub slippage_bps: Option<Decimal>,
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub warnings: Vec<ApiWarning>,
    #[serde(default)]
    pub client_order_id: Option<String>,
}

/// Response of the v3 order endpoint.
///
/// Only the fields shared with v1 are typed; anything else the server adds is
/// kept in `extra` so callers can still reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponseV3 {
    pub status: String,
    #[serde(default)]
    pub fx_quote_id: Option<String>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub token_pair: Option<TokenPair>,
    #[serde(default)]
    pub quantity_requested: Option<Quantity>,
    #[serde(default)]
    pub side_requested: Option<QuoteSide>,
    #[serde(default)]
    pub side_executed: Option<Side>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub limit_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_option",
        serialize_with = "serde_helpers::serialize_decimal_option"
    )]
    pub price_executed: Option<Decimal>,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(default)]
    pub t_execute: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default, deserialize_with = "serde_helpers::null_as_default")]
    pub warnings: Vec<ApiWarning>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub token: String,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub balance: Decimal,
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalBalance {
    pub token: String,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
    pub platform: Platform,
    pub token: String,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub quantity: Decimal,
    pub t_create: DateTime<FixedOffset>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeVolume {
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub usd_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLimit {
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub available: Decimal,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub total: Decimal,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub used: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLimits {
    pub gross_limits: TradeLimit,
    pub net_limits: TradeLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSizeLimit {
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub max: Decimal,
    #[serde(
        deserialize_with = "serde_helpers::deserialize_decimal",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub min: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSize {
    pub platform: Platform,
    pub token_pair: TokenPair,
    #[serde(rename = "trade_size_limits_in_quote_token")]
    pub limits_in_quote_token: TradeSizeLimit,
}
