use serde_json::{Map, Value};

/// Exchange-native instrument identifier ("BTCUSDT" on Binance, "BTC-USDT" on OKEx)
pub type Symbol = String;

/// Trade or ticker record exactly as the exchange returned it.
///
/// Fields are not interpreted; each key becomes a column in the exported sheet.
pub type TradeRecord = Map<String, Value>;
