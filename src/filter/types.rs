use crate::models::{Category, PropertyRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Search constraints captured when a search is submitted.
/// Every field is optional; `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact listing type
    pub category: Option<Category>,
    /// Minimum price (inclusive)
    pub min_price: Option<f64>,
    /// Maximum price (inclusive)
    pub max_price: Option<f64>,
    /// Minimum number of bedrooms
    pub min_bedrooms: Option<u32>,
    /// Maximum number of bedrooms
    pub max_bedrooms: Option<u32>,
    /// Earliest added date (inclusive)
    pub added_after: Option<NaiveDate>,
    /// Case-insensitive substring of the location, e.g. a postcode prefix
    pub location: Option<String>,
}

impl FilterCriteria {
    /// True when no field constrains the result
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Does a single record satisfy every constraint?
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        self.category_matches(record)
            && self.price_matches(record)
            && self.bedrooms_matches(record)
            && self.added_matches(record)
            && self.location_matches(record)
    }

    fn category_matches(&self, record: &PropertyRecord) -> bool {
        self.category.map_or(true, |category| record.category == category)
    }

    fn price_matches(&self, record: &PropertyRecord) -> bool {
        self.min_price.map_or(true, |min| record.price >= min)
            && self.max_price.map_or(true, |max| record.price <= max)
    }

    fn bedrooms_matches(&self, record: &PropertyRecord) -> bool {
        self.min_bedrooms.map_or(true, |min| record.bedrooms >= min)
            && self.max_bedrooms.map_or(true, |max| record.bedrooms <= max)
    }

    // A record whose added date cannot be composed never satisfies a lower bound.
    fn added_matches(&self, record: &PropertyRecord) -> bool {
        match self.added_after {
            None => true,
            Some(bound) => record.added.to_date().map_or(false, |date| date >= bound),
        }
    }

    fn location_matches(&self, record: &PropertyRecord) -> bool {
        match &self.location {
            None => true,
            Some(needle) => record
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}
