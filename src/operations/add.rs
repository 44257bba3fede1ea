use crate::error::{TrackerError, TrackerResult};
use crate::models::amount::{format_money, max_amount, parse_amount, within_limit};
use crate::models::category::{Category, category_names};
use crate::models::transaction::Transaction;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

const MAX_DESCRIPTION_LEN: usize = 255;

/// Raw form input for a new expense.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub description: String,
    pub category: String,
    pub amount: String,
    /// `YYYY-MM-DD`; today (UTC) when absent.
    pub date: Option<String>,
}

pub fn create_transaction(
    input: &NewTransaction,
    existing: &[Transaction],
    now: DateTime<Utc>,
) -> TrackerResult<Transaction> {
    let description = input.description.trim();
    if description.is_empty() {
        return Err(TrackerError::validation("Description cannot be empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TrackerError::validation("Description too long"));
    }

    let category = Category::from_name(&input.category).ok_or_else(|| {
        TrackerError::validation(format!(
            "Unknown category '{}'. Use one of: {}",
            input.category.trim(),
            category_names().join(", ")
        ))
    })?;

    let amount = match parse_amount(&input.amount) {
        Some(amount) => amount,
        None => {
            return Err(TrackerError::validation(format!(
                "Invalid amount format {}. Please provide a valid decimal number.",
                input.amount.trim()
            )));
        }
    };
    if amount < Decimal::ZERO {
        return Err(TrackerError::validation("Amount cannot be negative"));
    }
    if !within_limit(amount) {
        return Err(TrackerError::validation(format!(
            "Amount is too large. The maximum is {}.",
            format_money(max_amount())
        )));
    }

    let date = match input.date.as_deref().map(str::trim) {
        None | Some("") => now.date_naive(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| TrackerError::validation("Invalid date format. Please use YYYY-MM-DD."))?,
    };

    Ok(Transaction::new(
        next_transaction_id(existing, now),
        description.to_string(),
        category.name().to_string(),
        amount,
        date,
        now,
    ))
}

/// Creation time in epoch milliseconds. Two adds in the same millisecond would
/// collide, so a taken id is bumped past the largest one in the period.
pub fn next_transaction_id(existing: &[Transaction], now: DateTime<Utc>) -> i64 {
    let candidate = now.timestamp_millis();
    if existing.iter().any(|t| t.id == candidate) {
        existing
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(candidate)
            .saturating_add(1)
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::transaction_store::sample_transaction;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 9, 15, 0).unwrap()
    }

    fn input(description: &str, category: &str, amount: &str, date: Option<&str>) -> NewTransaction {
        NewTransaction {
            description: description.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_create_transaction_success() {
        let tx = create_transaction(&input(" Coffee ", "food", "3.50", Some("2025-01-18")), &[], now())
            .unwrap();

        assert_eq!(tx.id, now().timestamp_millis());
        assert_eq!(tx.description, "Coffee");
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.amount, Decimal::from_str("3.50").unwrap());
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 1, 18).unwrap());
        assert_eq!(tx.timestamp, now());
    }

    #[test]
    fn test_create_transaction_defaults_date_to_today() {
        let tx = create_transaction(&input("Lunch", "Food", "12", None), &[], now()).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
    }

    #[test]
    fn test_create_transaction_invalid_amount() {
        let result = create_transaction(&input("Lunch", "Food", "abc", None), &[], now());
        assert!(result.unwrap_err().to_string().contains("Invalid amount format"));
    }

    #[test]
    fn test_create_transaction_negative_amount() {
        let result = create_transaction(&input("Refund", "Food", "-4", None), &[], now());
        assert_eq!(result.unwrap_err().to_string(), "Amount cannot be negative");
    }

    #[test]
    fn test_create_transaction_zero_amount_allowed() {
        assert!(create_transaction(&input("Free sample", "Food", "0", None), &[], now()).is_ok());
    }

    #[test]
    fn test_create_transaction_amount_limit() {
        let result = create_transaction(
            &input("Yacht", "Shopping", "79228162514264337593543950335", None),
            &[],
            now(),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Amount is too large. The maximum is $10000000000000.00."
        );

        let largest = create_transaction(&input("House", "Housing", "9999999999999.99", None), &[], now());
        assert!(largest.is_ok());
    }

    #[test]
    fn test_create_transaction_unknown_category() {
        let result = create_transaction(&input("Gift", "Presents", "10", None), &[], now());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Unknown category 'Presents'"));
        assert!(message.contains("Miscellaneous"));
    }

    #[test]
    fn test_create_transaction_invalid_date() {
        let result = create_transaction(&input("Gift", "Shopping", "10", Some("20/01/2025")), &[], now());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid date format. Please use YYYY-MM-DD."
        );
    }

    #[test]
    fn test_create_transaction_description_rules() {
        let empty = create_transaction(&input("   ", "Food", "1", None), &[], now());
        assert_eq!(empty.unwrap_err().to_string(), "Description cannot be empty");

        let long = "a".repeat(256);
        let too_long = create_transaction(&input(&long, "Food", "1", None), &[], now());
        assert_eq!(too_long.unwrap_err().to_string(), "Description too long");
    }

    #[test]
    fn test_next_transaction_id_avoids_collision() {
        let taken = now().timestamp_millis();
        let existing = vec![sample_transaction(taken, "Food", 1, 2), sample_transaction(taken + 5, "Food", 1, 3)];

        assert_eq!(next_transaction_id(&existing, now()), taken + 6);
        assert_eq!(next_transaction_id(&[], now()), taken);
    }
}
