use crate::models::category::Category;
use crate::models::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) matches everything; known category names are
    /// normalized to their canonical spelling.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return CategoryFilter::All;
        }
        match Category::from_name(input) {
            Some(category) => CategoryFilter::Only(category.name().to_string()),
            None => CategoryFilter::Only(input.to_string()),
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Text search over description and category, then the category filter.
/// Newest date first; transactions on the same date keep their stored order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    search_text: &str,
    category_filter: &CategoryFilter,
) -> Vec<&'a Transaction> {
    let needle = search_text.to_lowercase();
    let mut matches: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.description.to_lowercase().contains(&needle)
                || t.category.to_lowercase().contains(&needle)
        })
        .filter(|t| category_filter.matches(&t.category))
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}
