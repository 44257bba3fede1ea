use crate::db::kv_store::KeyValueStore;
use crate::error::{TrackerError, TrackerResult};
use crate::models::period::Period;
use crate::models::transaction::Transaction;
use tracing::{info, warn};

/// Transactions of one period. A missing key (or a stored `null`) is an empty
/// list; anything unparseable is reported, never silently dropped.
pub fn list_transactions(store: &dyn KeyValueStore, period: &Period) -> TrackerResult<Vec<Transaction>> {
    let key = period.transactions_key();
    let raw = match store.get(&key)? {
        Some(raw) => raw,
        None => return Ok(Vec::new()),
    };

    serde_json::from_str::<Option<Vec<Transaction>>>(&raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            warn!(key = %key, error = %e, "stored transactions are not readable");
            TrackerError::corrupted(&key, e)
        })
}

/// Replaces the whole stored list for the period.
pub fn save_transactions(
    store: &dyn KeyValueStore,
    period: &Period,
    transactions: &[Transaction],
) -> TrackerResult<()> {
    let key = period.transactions_key();
    let json = serde_json::to_string(transactions)?;
    store.set(&key, &json)
}

pub fn add_transaction(
    store: &dyn KeyValueStore,
    period: &Period,
    transaction: Transaction,
) -> TrackerResult<()> {
    let mut transactions = list_transactions(store, period)?;
    info!(id = transaction.id, period = %period, "adding transaction");
    transactions.push(transaction);
    save_transactions(store, period, &transactions)
}

/// Drops every entry with `id` and returns what is left.
pub fn delete_transaction(
    store: &dyn KeyValueStore,
    period: &Period,
    id: i64,
) -> TrackerResult<Vec<Transaction>> {
    let mut transactions = list_transactions(store, period)?;
    let before = transactions.len();
    transactions.retain(|t| t.id != id);
    info!(id, removed = before - transactions.len(), period = %period, "deleting transaction");
    save_transactions(store, period, &transactions)?;
    Ok(transactions)
}

pub fn clear_transactions(store: &dyn KeyValueStore, period: &Period) -> TrackerResult<()> {
    info!(period = %period, "clearing transactions");
    save_transactions(store, period, &[])
}

#[cfg(test)]
pub fn sample_transaction(id: i64, category: &str, amount: i64, day: u32) -> Transaction {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    Transaction::new(
        id,
        format!("Expense {}", id),
        category.to_string(),
        Decimal::from(amount),
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
    )
}
