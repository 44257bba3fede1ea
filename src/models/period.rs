use chrono::{Datelike, Local, Month};
use std::fmt;

pub const TRANSACTIONS_PREFIX: &str = "transactions-";
pub const INCOME_PREFIX: &str = "income-";

/// Years offered by the period selector. Storage itself accepts any year.
pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2040;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub month: Month,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKeyKind {
    Transactions,
    Income,
}

impl Period {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    pub fn current() -> Self {
        let now = Local::now();
        let month = Month::try_from(now.month() as u8).unwrap_or(Month::January);
        Self::new(month, now.year())
    }

    /// `"{Month}-{year}"`, e.g. `"January-2025"`.
    pub fn period_key(&self) -> String {
        format!("{}-{}", self.month.name(), self.year)
    }

    pub fn transactions_key(&self) -> String {
        format!("{}{}", TRANSACTIONS_PREFIX, self.period_key())
    }

    pub fn income_key(&self) -> String {
        format!("{}{}", INCOME_PREFIX, self.period_key())
    }

    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self::new(Month::December, self.year - 1),
            month => Self::new(month.pred(), self.year),
        }
    }

    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self::new(Month::January, self.year + 1),
            month => Self::new(month.succ(), self.year),
        }
    }

    /// Sort key: chronological order.
    pub fn ordinal(&self) -> (i32, u32) {
        (self.year, self.month.number_from_month())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// Accepts full month names or three-letter abbreviations in any case.
pub fn parse_month(input: &str) -> Result<Month, String> {
    input
        .trim()
        .parse::<Month>()
        .map_err(|_| format!("Invalid month '{}'. Use a month name like January.", input.trim()))
}

pub fn is_period_data_key(key: &str) -> bool {
    key.starts_with(TRANSACTIONS_PREFIX) || key.starts_with(INCOME_PREFIX)
}

/// Reverse of the key derivation. Returns `None` for keys this program never writes.
pub fn parse_storage_key(key: &str) -> Option<(StorageKeyKind, Period)> {
    let (kind, rest) = if let Some(rest) = key.strip_prefix(TRANSACTIONS_PREFIX) {
        (StorageKeyKind::Transactions, rest)
    } else if let Some(rest) = key.strip_prefix(INCOME_PREFIX) {
        (StorageKeyKind::Income, rest)
    } else {
        return None;
    };

    let (month_str, year_str) = rest.rsplit_once('-')?;
    let month = month_str.parse::<Month>().ok()?;
    if month.name() != month_str {
        return None;
    }
    let year = year_str.parse::<i32>().ok()?;
    Some((kind, Period::new(month, year)))
}
