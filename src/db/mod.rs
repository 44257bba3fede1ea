pub mod connection;
pub mod income_store;
pub mod kv_store;
pub mod settings_store;
pub mod transaction_store;
