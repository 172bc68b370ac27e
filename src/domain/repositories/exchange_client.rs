//! Exchange Client Trait
//!
//! Common interface over the REST adapters of each exchange. The pipeline only
//! talks to this trait, which keeps it independent of endpoint shapes and lets
//! tests drive it with canned responses.

use crate::domain::entities::exchange::Exchange;
use crate::domain::entities::instrument::{Symbol, TradeRecord};
use crate::domain::errors::ExchangeError;
use async_trait::async_trait;

/// Common result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Exchange served by this client
    fn exchange(&self) -> Exchange;

    /// Fetch the instrument listing once and extract one symbol per instrument
    ///
    /// # Returns
    /// Symbols in the order the exchange listed them
    async fn list_symbols(&self) -> ExchangeResult<Vec<Symbol>>;

    /// Fetch trade data for every given symbol
    ///
    /// Issues one request per symbol, sequentially and in order. The caller
    /// passes the listing it already holds so the listing endpoint is not hit
    /// again.
    ///
    /// # Arguments
    /// * `symbols` - Symbols as returned by `list_symbols`
    async fn list_trades(&self, symbols: &[Symbol]) -> ExchangeResult<Vec<TradeRecord>>;
}
