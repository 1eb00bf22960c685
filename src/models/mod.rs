use crate::error::ShortlistError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable listing identifier. Catalog documents use either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawPropertyId")]
pub struct PropertyId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPropertyId {
    Text(String),
    Number(i64),
}

impl From<RawPropertyId> for PropertyId {
    fn from(raw: RawPropertyId) -> Self {
        match raw {
            RawPropertyId::Text(text) => Self(text),
            RawPropertyId::Number(n) => Self(n.to_string()),
        }
    }
}

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for PropertyId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Listing type. The set is closed and names are case-sensitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    House,
    Flat,
    Bungalow,
    Penthouse,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::House,
        Category::Flat,
        Category::Bungalow,
        Category::Penthouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::House => "House",
            Category::Flat => "Flat",
            Category::Bungalow => "Bungalow",
            Category::Penthouse => "Penthouse",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown property type '{}' (expected one of: House, Flat, Bungalow, Penthouse)",
                    s
                )
            })
    }
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Resolve an English month name to its 1-based index.
///
/// Accepts the full name or any prefix of at least three letters
/// ("Jan", "Sept", "Octob"), ignoring case and surrounding whitespace.
pub fn parse_month(name: &str) -> Option<u32> {
    let needle = name.trim().to_lowercase();
    if needle.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|full| full.starts_with(&needle))
        .map(|index| index as u32 + 1)
}

/// Date a listing was added, as it appears in the catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddedDate {
    pub day: u32,
    pub month: String,
    pub year: i32,
}

impl AddedDate {
    pub fn new(day: u32, month: impl Into<String>, year: i32) -> Self {
        Self {
            day,
            month: month.into(),
            year,
        }
    }

    /// Calendar date, or `None` when the month name is unknown or the day
    /// does not exist in that month.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let month = parse_month(&self.month)?;
        NaiveDate::from_ymd_opt(self.year, month, self.day)
    }
}

impl fmt::Display for AddedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.day, self.month, self.year)
    }
}

/// A single listing from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: PropertyId,
    #[serde(rename = "type")]
    pub category: Category,
    pub price: f64,
    pub bedrooms: u32,
    pub location: String,
    pub added: AddedDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan: Option<String>,
}

impl PropertyRecord {
    /// Record with only the filterable fields set.
    pub fn new(
        id: impl Into<PropertyId>,
        category: Category,
        price: f64,
        bedrooms: u32,
        location: impl Into<String>,
        added: AddedDate,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            price,
            bedrooms,
            location: location.into(),
            added,
            picture: None,
            short_description: None,
            description: None,
            images: Vec::new(),
            floor_plan: None,
        }
    }

    /// Check the invariants the serde schema cannot express.
    /// Applied wherever records enter from outside: catalog documents, drag
    /// payloads and stored favourites.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ShortlistError::InvalidRecord {
                id: self.id.to_string(),
                reason: format!("price {} must be finite and non-negative", self.price),
            });
        }
        Ok(())
    }

    /// One-line summary for listings
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} in {}: {} bedrooms, {:.0}, added {}",
            self.id, self.category, self.location, self.bedrooms, self.price, self.added
        )
    }
}
