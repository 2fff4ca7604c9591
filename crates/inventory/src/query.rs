//! In-memory search/filter/sort over a medicine list.

use serde::{Deserialize, Serialize};

use crate::item::MedicineItem;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    /// quantity < 5
    Low,
    /// quantity >= 5
    Normal,
}

/// Current search box + filter dropdowns of the inventory screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineFilter {
    /// Case-insensitive substring over name, category and description.
    pub search: String,
    /// Exact category match; `None` means any category.
    pub category: Option<String>,
    pub stock: StockFilter,
}

impl MedicineFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_stock(mut self, stock: StockFilter) -> Self {
        self.stock = stock;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_none() && self.stock == StockFilter::All
    }

    pub fn matches(&self, item: &MedicineItem) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || item.name.to_lowercase().contains(&term)
            || item.category.to_lowercase().contains(&term)
            || item
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|c| c.is_empty() || item.category == c);

        let matches_stock = match self.stock {
            StockFilter::All => true,
            StockFilter::Low => item.is_low_stock(),
            StockFilter::Normal => !item.is_low_stock(),
        };

        matches_search && matches_category && matches_stock
    }

    /// Filter the full list (never a previously filtered subset).
    pub fn apply(&self, items: &[MedicineItem]) -> Vec<MedicineItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Display order: closest expiry first, ties by id.
pub fn sort_by_expiry(items: &mut [MedicineItem]) {
    items.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::sample;

    fn cache() -> Vec<MedicineItem> {
        let mut betadine = sample(2, "Betadine", "Cairan", 3, "2024-06-30");
        betadine.description = Some("Antiseptik untuk luka".into());
        vec![sample(7, "Vitamin C", "Tablet", 1, "2024-05-15"), betadine]
    }

    #[test]
    fn category_and_search_combine() {
        let filter = MedicineFilter::search("vita").with_category("Tablet");
        let visible = filter.apply(&cache());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Vitamin C");
    }

    #[test]
    fn search_covers_description_case_insensitively() {
        let visible = MedicineFilter::search("ANTISEPTIK").apply(&cache());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Betadine");
    }

    #[test]
    fn stock_filter_splits_on_threshold() {
        let mut items = cache();
        items.push(sample(3, "Hansaplast", "Plester", 25, "2025-03-15"));

        let low = MedicineFilter::default().with_stock(StockFilter::Low).apply(&items);
        assert_eq!(low.len(), 2);

        let normal = MedicineFilter::default().with_stock(StockFilter::Normal).apply(&items);
        assert_eq!(normal.len(), 1);
        assert_eq!(normal[0].name, "Hansaplast");
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = MedicineFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&cache()).len(), 2);
    }

    #[test]
    fn sorts_by_expiry_ascending() {
        let mut items = vec![
            sample(3, "Hansaplast", "Plester", 25, "2025-03-15"),
            sample(2, "Betadine", "Cairan", 3, "2024-06-30"),
            sample(7, "Vitamin C", "Tablet", 1, "2024-05-15"),
        ];
        sort_by_expiry(&mut items);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Vitamin C", "Betadine", "Hansaplast"]);
    }
}
