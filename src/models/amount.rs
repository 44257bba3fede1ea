use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses plain (`12.5`) or scientific (`1.25e1`) decimal text.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

/// Amounts are stored as JSON floats. Up to this size, with cents, they keep
/// fifteen significant digits and read back unchanged.
const MAX_AMOUNT_UNITS: i64 = 10_000_000_000_000;

pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

pub fn within_limit(amount: Decimal) -> bool {
    amount <= max_amount()
}

/// Sum that clamps at the Decimal range instead of overflowing. Imported data
/// is not limited to `max_amount`.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Two-decimal dollar rendering used everywhere amounts are shown.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
