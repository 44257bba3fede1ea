use crate::db::kv_store::KeyValueStore;
use crate::error::{TrackerError, TrackerResult};
use crate::models::amount::{parse_amount, within_limit};
use crate::models::period::Period;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Income for the period; zero when unset or unreadable. The stored text is
/// parsed as a decimal directly so no digits are lost to float conversion.
pub fn get_income(store: &dyn KeyValueStore, period: &Period) -> TrackerResult<Decimal> {
    let key = period.income_key();
    let raw = match store.get(&key)? {
        Some(raw) => raw,
        None => return Ok(Decimal::ZERO),
    };

    match parse_amount(raw.trim().trim_matches('"')) {
        Some(amount) => Ok(amount),
        None => {
            warn!(key = %key, raw = %raw, "stored income is not a number, using 0");
            Ok(Decimal::ZERO)
        }
    }
}

/// Overwrites the period's income. Stored as a plain JSON number.
pub fn set_income(store: &dyn KeyValueStore, period: &Period, amount: Decimal) -> TrackerResult<()> {
    if amount < Decimal::ZERO || !within_limit(amount) {
        return Err(TrackerError::validation("Please enter a valid income amount"));
    }
    info!(period = %period, %amount, "setting income");
    store.set(&period.income_key(), &amount.normalize().to_string())
}
