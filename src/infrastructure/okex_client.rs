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

/// OKEx spot v3 instruments endpoint
pub const OKEX_INSTRUMENTS_URL: &str = "https://www.okex.com/api/spot/v3/instruments";

/// Ticker endpoint for one instrument
pub fn ticker_url(instrument_id: &str) -> String {
    format!("{}/{}/ticker", OKEX_INSTRUMENTS_URL, instrument_id)
}

#[derive(Debug, Deserialize)]
struct Instrument {
    instrument_id: String,
}

/// OKEx REST client
pub struct OkexClient {
    http: Arc<dyn HttpFetch>,
}

impl OkexClient {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Extract `instrument_id` of every listed instrument, listing order preserved
    pub fn parse_instruments(body: Value) -> ExchangeResult<Vec<Symbol>> {
        let instruments: Vec<Instrument> = serde_json::from_value(body)
            .map_err(|e| ExchangeError::unexpected(Exchange::Okex, e.to_string()))?;
        Ok(instruments.into_iter().map(|i| i.instrument_id).collect())
    }

    pub fn parse_ticker(instrument_id: &str, body: Value) -> ExchangeResult<TradeRecord> {
        match body {
            Value::Object(record) => Ok(record),
            other => Err(ExchangeError::unexpected(
                Exchange::Okex,
                format!("ticker for {} is not an object: {}", instrument_id, other),
            )),
        }
    }
}

#[async_trait]
impl ExchangeClient for OkexClient {
    fn exchange(&self) -> Exchange {
        Exchange::Okex
    }

    async fn list_symbols(&self) -> ExchangeResult<Vec<Symbol>> {
        let body = self.http.fetch_json(OKEX_INSTRUMENTS_URL).await?;
        let instruments = Self::parse_instruments(body)?;
        info!("OKEx lists {} instruments", instruments.len());
        Ok(instruments)
    }

    async fn list_trades(&self, symbols: &[Symbol]) -> ExchangeResult<Vec<TradeRecord>> {
        let mut tickers = Vec::with_capacity(symbols.len());
        for instrument_id in symbols {
            let body = self.http.fetch_json(&ticker_url(instrument_id)).await?;
            tickers.push(Self::parse_ticker(instrument_id, body)?);
            debug!("Ticker fetched for {}", instrument_id);
        }
        info!("Fetched {} OKEx tickers", tickers.len());
        Ok(tickers)
    }
}
