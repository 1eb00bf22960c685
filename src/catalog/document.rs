use crate::error::Result;
use crate::models::{PropertyId, PropertyRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Top-level shape of a catalog document
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    properties: Vec<Value>,
}

/// The validated, session-immutable list of listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<PropertyRecord>,
    quarantined: usize,
}

impl Catalog {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self {
            records,
            quarantined: 0,
        }
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    /// Number of document entries skipped during validation
    pub fn quarantined(&self) -> usize {
        self.quarantined
    }

    pub fn find(&self, id: &PropertyId) -> Option<&PropertyRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a catalog document, quarantining entries that fail validation.
///
/// The document itself must be an object with a `properties` array; anything
/// else is a load error. Individual entries are checked one by one and the
/// survivors keep their document order.
pub fn parse_catalog(body: &str) -> Result<Catalog> {
    let document: CatalogDocument = serde_json::from_str(body)?;
    debug!("Catalog document has {} entries", document.properties.len());

    let mut records = Vec::with_capacity(document.properties.len());
    let mut seen = HashSet::new();
    let mut quarantined = 0;

    for (index, entry) in document.properties.into_iter().enumerate() {
        match validate_entry(entry) {
            Ok(record) if !seen.insert(record.id.clone()) => {
                warn!("Quarantined catalog entry {}: duplicate id {}", index, record.id);
                quarantined += 1;
            }
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("Quarantined catalog entry {}: {}", index, reason);
                quarantined += 1;
            }
        }
    }

    Ok(Catalog {
        records,
        quarantined,
    })
}

fn validate_entry(entry: Value) -> std::result::Result<PropertyRecord, String> {
    let record: PropertyRecord = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_parse_valid_document() {
        let body = r#"{
            "properties": [
                {"id": "prop1", "type": "House", "price": 750000, "bedrooms": 3,
                 "location": "Petts Wood Road, Petts Wood, Orpington BR5",
                 "added": {"month": "October", "day": 12, "year": 2022}},
                {"id": "prop2", "type": "Flat", "price": 399995, "bedrooms": 2,
                 "location": "Crofton Road Orpington BR6",
                 "added": {"month": "September", "day": 14, "year": 2022}}
            ]
        }"#;

        let catalog = parse_catalog(body).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.quarantined(), 0);
        assert_eq!(catalog.records()[0].id.as_str(), "prop1");
        assert_eq!(catalog.records()[1].category, Category::Flat);
        assert!(catalog.find(&PropertyId::new("prop2")).is_some());
        assert!(catalog.find(&PropertyId::new("prop3")).is_none());
    }

    #[test]
    fn test_bad_entries_are_quarantined_not_fatal() {
        let body = r#"{
            "properties": [
                {"id": 1, "type": "House", "price": 100, "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Jan", "year": 2025}},
                {"id": 2, "type": "House", "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Jan", "year": 2025}},
                {"id": 3, "type": "Castle", "price": 100, "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Jan", "year": 2025}},
                {"id": 4, "type": "Flat", "price": -5, "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Jan", "year": 2025}},
                {"id": 1, "type": "Flat", "price": 100, "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Jan", "year": 2025}},
                {"id": 5, "type": "Flat", "price": 100, "bedrooms": 1, "location": "BR1",
                 "added": {"day": 1, "month": "Smarch", "year": 2025}}
            ]
        }"#;

        let catalog = parse_catalog(body).unwrap();
        let ids: Vec<&str> = catalog.records().iter().map(|r| r.id.as_str()).collect();
        // Unknown month names survive loading; they only fail the date filter.
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(catalog.quarantined(), 4);
    }

    #[test]
    fn test_missing_properties_field_is_an_error() {
        assert!(parse_catalog(r#"{"listings": []}"#).is_err());
        assert!(parse_catalog("not json").is_err());
    }
}
