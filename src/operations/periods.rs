use crate::db::income_store::get_income;
use crate::db::kv_store::KeyValueStore;
use crate::db::transaction_store::list_transactions;
use crate::error::{TrackerError, TrackerResult};
use crate::models::amount::sum_amounts;
use crate::models::period::{Period, parse_storage_key};
use rust_decimal::Decimal;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: Period,
    /// `None` when the stored transaction list could not be read.
    pub transaction_count: Option<usize>,
    pub total_expenses: Option<Decimal>,
    pub income: Decimal,
}

/// Every period that has transactions or income stored, oldest first.
pub fn list_periods(store: &dyn KeyValueStore) -> TrackerResult<Vec<PeriodSummary>> {
    let mut periods: Vec<Period> = Vec::new();
    for key in store.list_keys()? {
        if let Some((_, period)) = parse_storage_key(&key) {
            if !periods.contains(&period) {
                periods.push(period);
            }
        }
    }
    periods.sort_by_key(|p| p.ordinal());

    let mut summaries = Vec::with_capacity(periods.len());
    for period in periods {
        let (transaction_count, total_expenses) = match list_transactions(store, &period) {
            Ok(transactions) => (
                Some(transactions.len()),
                Some(sum_amounts(transactions.iter().map(|t| t.amount))),
            ),
            Err(TrackerError::DataCorruption { key, .. }) => {
                warn!(key = %key, "skipping unreadable transactions in period listing");
                (None, None)
            }
            Err(e) => return Err(e),
        };
        summaries.push(PeriodSummary {
            period,
            transaction_count,
            total_expenses,
            income: get_income(store, &period)?,
        });
    }
    Ok(summaries)
}
