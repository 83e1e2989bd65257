use crate::models::sweet::{SearchQuery, Sweet};

/// Optional search criteria combined with logical AND
///
/// Text criteria are case-insensitive substring matches, folded the same
/// way for name and category. Price bounds are inclusive. An empty filter
/// matches everything.
#[derive(Clone, Debug, Default)]
pub struct SweetFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl SweetFilter {
    pub fn from_query(query: SearchQuery) -> Self {
        Self {
            name: query.name.filter(|s| !s.trim().is_empty()),
            category: query.category.filter(|s| !s.trim().is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }

    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = &self.name {
            if !contains_folded(&sweet.name, name) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !contains_folded(&sweet.category, category) {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if sweet.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if sweet.price > max {
                return false;
            }
        }

        true
    }
}
