use crate::error::{TrackerError, TrackerResult};
use crate::models::amount::{parse_amount, within_limit};
use rust_decimal::Decimal;

/// Validates user-entered income text.
pub fn parse_income(input: &str) -> TrackerResult<Decimal> {
    match parse_amount(input) {
        Some(amount) if amount >= Decimal::ZERO && within_limit(amount) => Ok(amount),
        _ => Err(TrackerError::validation("Please enter a valid income amount")),
    }
}
