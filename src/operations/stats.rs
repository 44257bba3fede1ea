use crate::models::amount::sum_amounts;
use crate::models::category::{Category, style_for};
use crate::models::transaction::Transaction;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Shown in place of a top category when a period has no transactions.
pub const NO_TOP_CATEGORY: &str = "-";

const WARNING_PERCENT: u32 = 70;
const DANGER_PERCENT: u32 = 90;

/// Presentation tier for how much of the income is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Danger,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStats {
    pub income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub percent_spent: Decimal,
    /// `percent_spent` capped at 100 for progress bars.
    pub progress_ratio: Decimal,
    pub severity: Severity,
    pub top_category: Option<String>,
    pub transaction_count: usize,
    pub category_totals: Vec<(String, Decimal)>,
}

impl PeriodStats {
    pub fn top_category_label(&self) -> &str {
        self.top_category.as_deref().unwrap_or(NO_TOP_CATEGORY)
    }
}

/// Dataset handed to chart widgets: parallel label/value/color lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

pub fn compute_stats(transactions: &[Transaction], income: Decimal) -> PeriodStats {
    let total_expenses = sum_amounts(transactions.iter().map(|t| t.amount));
    let balance = income.saturating_sub(total_expenses);
    let percent_spent = percent_of(total_expenses, income);
    let progress_ratio = percent_spent.min(Decimal::ONE_HUNDRED);

    PeriodStats {
        income,
        total_expenses,
        balance,
        percent_spent,
        progress_ratio,
        severity: severity_for(percent_spent),
        top_category: top_category(transactions),
        transaction_count: transactions.len(),
        category_totals: category_totals(transactions),
    }
}

fn percent_of(total: Decimal, income: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total
        .checked_div(income)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

pub fn severity_for(percent_spent: Decimal) -> Severity {
    if percent_spent > Decimal::from(DANGER_PERCENT) {
        Severity::Danger
    } else if percent_spent > Decimal::from(WARNING_PERCENT) {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Sums per category in the order categories first appear.
fn totals_in_encounter_order(transactions: &[Transaction]) -> Vec<(&str, Decimal)> {
    let mut totals: Vec<(&str, Decimal)> = Vec::new();
    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some(entry) => entry.1 = entry.1.saturating_add(transaction.amount),
            None => totals.push((transaction.category.as_str(), transaction.amount)),
        }
    }
    totals
}

/// Category with the largest total. On a tie the category seen first wins.
pub fn top_category(transactions: &[Transaction]) -> Option<String> {
    totals_in_encounter_order(transactions)
        .into_iter()
        .reduce(|a, b| if b.1 > a.1 { b } else { a })
        .map(|(category, _)| category.to_string())
}

/// All fixed categories (zero totals included), then any other category names
/// found in the transactions.
pub fn category_totals(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Category::ALL
        .iter()
        .map(|c| (c.name().to_string(), Decimal::ZERO))
        .collect();

    for (category, amount) in totals_in_encounter_order(transactions) {
        match totals.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = entry.1.saturating_add(amount),
            None => totals.push((category.to_string(), amount)),
        }
    }
    totals
}

pub fn chart_data(category_totals: &[(String, Decimal)]) -> ChartData {
    let mut chart = ChartData {
        labels: Vec::new(),
        data: Vec::new(),
        colors: Vec::new(),
    };
    for (category, amount) in category_totals {
        if *amount <= Decimal::ZERO {
            continue;
        }
        chart.labels.push(category.clone());
        chart.data.push(amount.to_f64().unwrap_or(0.0));
        chart.colors.push(style_for(category).color.to_string());
    }
    chart
}
