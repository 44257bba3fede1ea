use std::fmt;

pub const FALLBACK_COLOR: &str = "#C9CBCF";
pub const FALLBACK_ICON: &str = "📦";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Bills,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Miscellaneous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

impl Category {
    /// Display order used by totals and charts.
    pub const ALL: [Category; 9] = [
        Category::Housing,
        Category::Food,
        Category::Transportation,
        Category::Bills,
        Category::Entertainment,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Miscellaneous,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Housing => "Housing",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    pub fn style(self) -> CategoryStyle {
        let (color, icon) = match self {
            Category::Housing => ("#FF6384", "🏠"),
            Category::Food => ("#36A2EB", "🍔"),
            Category::Transportation => ("#FFCE56", "🚗"),
            Category::Bills => ("#4BC0C0", "💡"),
            Category::Entertainment => ("#9966FF", "🎬"),
            Category::Healthcare => ("#FF9F40", "⚕️"),
            Category::Shopping => ("#FF6384", "🛍️"),
            Category::Education => ("#4CAF50", "📚"),
            Category::Miscellaneous => ("#C9CBCF", "📦"),
        };
        CategoryStyle { color, icon }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Style for a stored category string. Names outside the fixed set can arrive
/// through imports and get the fallback look.
pub fn style_for(category: &str) -> CategoryStyle {
    match Category::ALL.into_iter().find(|c| c.name() == category) {
        Some(c) => c.style(),
        None => CategoryStyle {
            color: FALLBACK_COLOR,
            icon: FALLBACK_ICON,
        },
    }
}

pub fn category_names() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.name()).collect()
}
