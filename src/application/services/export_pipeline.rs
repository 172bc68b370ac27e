//! One run: fetch both listings once, fetch trades, reconcile, export.
//!
//! Every request is awaited before the next one is issued, so output order
//! always follows listing order.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::entities::exchange::Exchange;
use crate::domain::errors::PipelineError;
use crate::domain::repositories::exchange_client::ExchangeClient;
use crate::domain::services::symbol_reconciliation::{reconcile, Reconciliation};
use crate::domain::services::table::{NamedTable, Table};
use crate::infrastructure::xlsx_exporter;

/// Name of the reconciliation worksheet
pub const DIFF_SHEET: &str = "diff";

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub binance_symbols: usize,
    pub okex_symbols: usize,
    pub binance_trades: usize,
    pub okex_tickers: usize,
    pub diff_entries: usize,
    pub output_path: PathBuf,
}

/// Everything a run produces before it is written out
#[derive(Debug, Clone)]
pub struct RunData {
    pub tables: Vec<NamedTable>,
    pub reconciliation: Reconciliation,
    pub okex_symbols: usize,
    pub binance_trades: usize,
    pub okex_tickers: usize,
}

pub struct ExportPipeline {
    binance: Arc<dyn ExchangeClient>,
    okex: Arc<dyn ExchangeClient>,
    output_path: PathBuf,
}

impl ExportPipeline {
    pub fn new(
        binance: Arc<dyn ExchangeClient>,
        okex: Arc<dyn ExchangeClient>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            binance,
            okex,
            output_path: output_path.into(),
        }
    }

    /// Fetch and reshape without touching the filesystem
    pub async fn collect(&self) -> Result<RunData, PipelineError> {
        let binance_symbols = self.binance.list_symbols().await?;
        let okex_symbols = self.okex.list_symbols().await?;

        let binance_trades = self.binance.list_trades(&binance_symbols).await?;
        let okex_tickers = self.okex.list_trades(&okex_symbols).await?;

        let reconciliation = reconcile(&binance_symbols, &okex_symbols);
        info!(
            "Reconciled {} Binance against {} OKEx symbols: {} listed on one side only",
            binance_symbols.len(),
            okex_symbols.len(),
            reconciliation.diff.len()
        );

        let tables = vec![
            NamedTable::new(
                self.binance.exchange().trades_sheet(),
                Table::from_records(&binance_trades),
            ),
            NamedTable::new(
                self.okex.exchange().trades_sheet(),
                Table::from_records(&okex_tickers),
            ),
            NamedTable::new(DIFF_SHEET, Table::from_reconciliation(&reconciliation)),
        ];

        Ok(RunData {
            tables,
            reconciliation,
            okex_symbols: okex_symbols.len(),
            binance_trades: binance_trades.len(),
            okex_tickers: okex_tickers.len(),
        })
    }

    /// Full run. Any failure aborts before the spreadsheet is written.
    pub async fn run(&self) -> Result<ExportReport, PipelineError> {
        info!(
            "Starting export: {} vs {}",
            Exchange::Binance,
            Exchange::Okex
        );
        let data = self.collect().await?;

        xlsx_exporter::export(&data.tables, &self.output_path)?;

        let report = ExportReport {
            binance_symbols: data.reconciliation.binance.len(),
            okex_symbols: data.okex_symbols,
            binance_trades: data.binance_trades,
            okex_tickers: data.okex_tickers,
            diff_entries: data.reconciliation.diff.len(),
            output_path: self.output_path.clone(),
        };
        info!("Export finished: {:?}", report);
        Ok(report)
    }
}
