use crate::error::{TrackerError, TrackerResult};

pub fn parse_transaction_id(input: &str) -> TrackerResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TrackerError::validation("Transaction ID cannot be empty."));
    }
    input.parse::<i64>().map_err(|_| {
        TrackerError::validation(format!(
            "Invalid transaction ID '{}'. IDs are whole numbers.",
            input
        ))
    })
}
