/*
[INPUT]:  Configured REST client
[OUTPUT]: Logged results of each REST endpoint
[POS]:    Example runner - REST example set
[UPDATE]: When endpoints are added to the adapter
*/

use std::fmt::Debug;

use chrono::{Duration, Utc};
use falconx_adapter::{
    FalconxClient, OrderRequest, Platform, Quantity, QuoteExecutionRequest, QuoteRequest,
    QuoteSide, Result, Side, TimeInForce, TokenPair,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

fn report<T: Debug>(step: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => {
            info!(step, response = ?value, "example succeeded");
            Some(value)
        }
        Err(err) => {
            warn!(step, kind = %err.kind(), status = ?err.status(), error = %err, "example failed");
            None
        }
    }
}

/// Walk the REST endpoints in order; a failed step is logged and skipped
pub async fn run(client: &FalconxClient) {
    report("get_trading_pairs", client.get_trading_pairs().await);

    let token_pair = TokenPair::new("BTC", "USD");
    let quantity = Quantity::new("BTC", Decimal::new(1, 3));

    let quote_request = QuoteRequest {
        token_pair: token_pair.clone(),
        quantity: quantity.clone(),
        side: QuoteSide::Buy,
        client_order_id: None,
    };
    let quote = report("get_quote", client.get_quote(&quote_request).await);

    if let Some(quote) = &quote {
        let id = quote.fx_quote_id.as_str();
        report("get_quote_status", client.get_quote_status(id).await);

        let execution = QuoteExecutionRequest {
            fx_quote_id: quote.fx_quote_id.clone(),
            side: Side::Buy,
        };
        report("execute_quote", client.execute_quote(&execution).await);
        report("get_quote_status", client.get_quote_status(id).await);
    }

    // Price the limit order just above the quoted buy price when we have one.
    let limit_price = quote
        .as_ref()
        .and_then(|quote| quote.buy_price)
        .map(|price| price + Decimal::from(5))
        .unwrap_or_else(|| Decimal::from(1_000));
    let order = OrderRequest::limit(token_pair, quantity, Side::Buy, limit_price, TimeInForce::Fok)
        .with_slippage_bps(Decimal::from(5));
    report("place_order", client.place_order(&order).await);

    report("get_balances", client.get_balances(Platform::Api).await);

    let t_end = Utc::now().fixed_offset();
    let t_start = t_end - Duration::days(1);
    report(
        "get_executed_quotes",
        client.get_executed_quotes(t_start, t_end, None).await,
    );
    report("get_total_balances", client.get_total_balances().await);
    report("get_trade_sizes", client.get_trade_sizes().await);
    report("get_trade_limits", client.get_trade_limits(Platform::Api).await);
    report("get_trade_volume", client.get_trade_volume(t_start, t_end).await);
    report(
        "get_transfers",
        client.get_transfers(t_start, t_end, None).await,
    );
}
