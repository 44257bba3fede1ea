use crate::db::kv_store::KeyValueStore;
use crate::db::{income_store, transaction_store};
use crate::error::TrackerResult;
use crate::models::period::Period;
use crate::models::transaction::Transaction;
use crate::operations::add::{NewTransaction, create_transaction};
use crate::operations::income::parse_income;
use crate::operations::search::{CategoryFilter, filter_transactions};
use crate::operations::stats::{ChartData, PeriodStats, chart_data, compute_stats};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The store plus the period the user is looking at. Every command runs
/// against one of these.
pub struct Session<'a> {
    store: &'a dyn KeyValueStore,
    period: Period,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn KeyValueStore, period: Period) -> Self {
        Self { store, period }
    }

    pub fn store(&self) -> &'a dyn KeyValueStore {
        self.store
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn select_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn transactions(&self) -> TrackerResult<Vec<Transaction>> {
        transaction_store::list_transactions(self.store, &self.period)
    }

    pub fn add_transaction(&self, input: &NewTransaction) -> TrackerResult<Transaction> {
        self.add_transaction_at(input, Utc::now())
    }

    pub fn add_transaction_at(
        &self,
        input: &NewTransaction,
        now: DateTime<Utc>,
    ) -> TrackerResult<Transaction> {
        let existing = self.transactions()?;
        let transaction = create_transaction(input, &existing, now)?;
        transaction_store::add_transaction(self.store, &self.period, transaction.clone())?;
        Ok(transaction)
    }

    pub fn delete_transaction(&self, id: i64) -> TrackerResult<Vec<Transaction>> {
        transaction_store::delete_transaction(self.store, &self.period, id)
    }

    pub fn clear_transactions(&self) -> TrackerResult<()> {
        transaction_store::clear_transactions(self.store, &self.period)
    }

    pub fn income(&self) -> TrackerResult<Decimal> {
        income_store::get_income(self.store, &self.period)
    }

    /// Parses and stores user-entered income; the stored value is untouched on error.
    pub fn set_income(&self, input: &str) -> TrackerResult<Decimal> {
        let amount = parse_income(input)?;
        income_store::set_income(self.store, &self.period, amount)?;
        Ok(amount)
    }

    pub fn stats(&self) -> TrackerResult<PeriodStats> {
        Ok(compute_stats(&self.transactions()?, self.income()?))
    }

    pub fn chart_data(&self) -> TrackerResult<ChartData> {
        Ok(chart_data(&self.stats()?.category_totals))
    }

    pub fn filter(&self, search_text: &str, category: &CategoryFilter) -> TrackerResult<Vec<Transaction>> {
        let transactions = self.transactions()?;
        Ok(filter_transactions(&transactions, search_text, category)
            .into_iter()
            .cloned()
            .collect())
    }
}
