pub mod types;

pub use types::FilterCriteria;

use crate::models::PropertyRecord;

/// Records from `catalog` that satisfy every constraint in `criteria`,
/// in catalog order.
pub fn apply(catalog: &[PropertyRecord], criteria: &FilterCriteria) -> Vec<PropertyRecord> {
    if criteria.is_empty() {
        return catalog.to_vec();
    }

    catalog
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}
