pub mod exchange_client;
