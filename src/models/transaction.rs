use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One expense, stored as an element of a period's JSON array. Field order
/// matches the stored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: i64,
        description: String,
        category: String,
        amount: Decimal,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description,
            category,
            amount,
            date,
            timestamp,
        }
    }
}
