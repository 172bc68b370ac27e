pub mod binance_client;
pub mod http_client;
pub mod okex_client;
pub mod xlsx_exporter;
