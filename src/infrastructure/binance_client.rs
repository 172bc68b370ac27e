use crate::domain::entities::exchange::Exchange;
use crate::domain::entities::instrument::{Symbol, TradeRecord};
use crate::domain::errors::ExchangeError;
use crate::domain::repositories::exchange_client::{ExchangeClient, ExchangeResult};
use crate::infrastructure::http_client::HttpFetch;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Binance spot API endpoints
pub const BINANCE_API_BASE: &str = "https://api.binance.com";
pub const BINANCE_EXCHANGE_INFO_URL: &str = "https://api.binance.com/api/v3/exchangeInfo";

/// Recent trades endpoint for one symbol
pub fn trades_url(symbol: &str) -> String {
    format!("{}/api/v3/trades?symbol={}", BINANCE_API_BASE, symbol)
}

/// Subset of `/api/v3/exchangeInfo` this client reads
#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
}

/// Binance REST client
pub struct BinanceClient {
    http: Arc<dyn HttpFetch>,
}

impl BinanceClient {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Extract the symbol of every listed instrument, listing order preserved
    pub fn parse_symbols(body: Value) -> ExchangeResult<Vec<Symbol>> {
        let info: ExchangeInfo = serde_json::from_value(body)
            .map_err(|e| ExchangeError::unexpected(Exchange::Binance, e.to_string()))?;
        Ok(info.symbols.into_iter().map(|s| s.symbol).collect())
    }

    /// Split a `/api/v3/trades` response into records
    pub fn parse_trades(symbol: &str, body: Value) -> ExchangeResult<Vec<TradeRecord>> {
        let Value::Array(entries) = body else {
            return Err(ExchangeError::unexpected(
                Exchange::Binance,
                format!("trades for {} are not an array", symbol),
            ));
        };

        entries
            .into_iter()
            .map(|entry| match entry {
                Value::Object(record) => Ok(record),
                other => Err(ExchangeError::unexpected(
                    Exchange::Binance,
                    format!("trade entry for {} is not an object: {}", symbol, other),
                )),
            })
            .collect()
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn list_symbols(&self) -> ExchangeResult<Vec<Symbol>> {
        let body = self.http.fetch_json(BINANCE_EXCHANGE_INFO_URL).await?;
        let symbols = Self::parse_symbols(body)?;
        info!("Binance lists {} symbols", symbols.len());
        Ok(symbols)
    }

    async fn list_trades(&self, symbols: &[Symbol]) -> ExchangeResult<Vec<TradeRecord>> {
        let mut trades = Vec::new();
        for symbol in symbols {
            let body = self.http.fetch_json(&trades_url(symbol)).await?;
            let batch = Self::parse_trades(symbol, body)?;
            debug!("{} trades for {}", batch.len(), symbol);
            trades.extend(batch);
        }
        info!(
            "Fetched {} Binance trades across {} symbols",
            trades.len(),
            symbols.len()
        );
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::MockHttpFetcher;
    use serde_json::json;

    #[test]
    fn test_trades_url() {
        assert_eq!(
            trades_url("BTCUSDT"),
            "https://api.binance.com/api/v3/trades?symbol=BTCUSDT"
        );
    }

    #[test]
    fn test_parse_symbols_preserves_order() {
        let body = json!({
            "timezone": "UTC",
            "symbols": [
                {"symbol": "ETHBTC", "status": "TRADING"},
                {"symbol": "BTCUSDT", "status": "TRADING"},
                {"symbol": "AAAUSDT", "status": "BREAK"}
            ]
        });

        let symbols = BinanceClient::parse_symbols(body).unwrap();

        assert_eq!(symbols, vec!["ETHBTC", "BTCUSDT", "AAAUSDT"]);
    }

    #[test]
    fn test_parse_symbols_rejects_missing_field() {
        let body = json!({"symbols": [{"status": "TRADING"}]});
        assert!(matches!(
            BinanceClient::parse_symbols(body),
            Err(ExchangeError::UnexpectedPayload { .. })
        ));
    }

    #[test]
    fn test_parse_trades_rejects_object_body() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(BinanceClient::parse_trades("XXX", body).is_err());
    }

    #[tokio::test]
    async fn test_list_trades_requests_each_symbol_in_order() {
        let fetcher = Arc::new(
            MockHttpFetcher::new()
                .with_json(trades_url("BTCUSDT"), json!([{"id": 1}, {"id": 2}]))
                .with_json(trades_url("ETHUSDT"), json!([{"id": 7}])),
        );
        let client = BinanceClient::new(fetcher.clone());
        let symbols = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];

        let trades = client.list_trades(&symbols).await.unwrap();

        assert_eq!(trades.len(), 3);
        assert_eq!(trades[2]["id"], json!(7));
        assert_eq!(
            fetcher.calls(),
            vec![trades_url("BTCUSDT"), trades_url("ETHUSDT")]
        );
    }

    #[tokio::test]
    async fn test_list_trades_is_not_cumulative() {
        let fetcher =
            Arc::new(MockHttpFetcher::new().with_json(trades_url("BTCUSDT"), json!([{"id": 1}])));
        let client = BinanceClient::new(fetcher);
        let symbols = vec!["BTCUSDT".to_string()];

        let first = client.list_trades(&symbols).await.unwrap();
        let second = client.list_trades(&symbols).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_list_symbols_propagates_http_error() {
        let fetcher = Arc::new(MockHttpFetcher::new().with_status(BINANCE_EXCHANGE_INFO_URL, 500));
        let client = BinanceClient::new(fetcher);

        let err = client.list_symbols().await.unwrap_err();

        match err {
            ExchangeError::Transport(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
