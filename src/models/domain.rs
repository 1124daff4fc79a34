use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::lenient;

/// Listing category
///
/// Only `Sale` and `Demand` take part in matching; `Contract` listings are
/// dropped when a snapshot is partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ListingType {
    Sale,
    Demand,
    Contract,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown listing type: {0:?}")]
pub struct ListingTypeError(pub String);

impl FromStr for ListingType {
    type Err = ListingTypeError;

    /// Accepts the canonical names and the Russian aliases the catalog uses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" | "продажа" => Ok(ListingType::Sale),
            "demand" | "спрос" | "покупка" => Ok(ListingType::Demand),
            "contract" | "контракт" | "договор" => Ok(ListingType::Contract),
            _ => Err(ListingTypeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ListingType {
    type Error = ListingTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListingType::Sale => "sale",
            ListingType::Demand => "demand",
            ListingType::Contract => "contract",
        };
        f.write_str(name)
    }
}

/// Catalog listing snapshot, read-only to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::object_or_none")]
    pub characteristics: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal_or_none")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
}

impl Listing {
    pub fn new(id: i64, listing_type: ListingType, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            characteristics: None,
            location: None,
            price: None,
            contact: None,
            listing_type,
        }
    }

    pub fn demand(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, ListingType::Demand, title)
    }

    pub fn sale(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, ListingType::Sale, title)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_characteristic(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.characteristics
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Scoring weights
///
/// Not normalized: a pair score lies in `[0, title + characteristics + location + price]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub title: f64,
    pub characteristics: f64,
    pub location: f64,
    pub price: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.title + self.characteristics + self.location + self.price
    }

    /// False when no pair could score above zero
    pub fn can_score(&self) -> bool {
        self.total() > 0.0
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 0.60,
            characteristics: 0.20,
            location: 0.15,
            price: 0.05,
        }
    }
}

/// Allowance within which two prices count as equal
///
/// `percent` is applied to the larger of the two prices; when both are set the
/// larger allowance wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTolerance {
    pub absolute: Option<Decimal>,
    pub percent: Option<Decimal>,
}

/// Immutable parameter set for one matching call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub threshold: f64,
    pub weights: ScoringWeights,
    pub price_tolerance: PriceTolerance,
    pub fuzzy_token_threshold: f64,
}

pub const DEFAULT_THRESHOLD: f64 = 0.45;
pub const DEFAULT_FUZZY_TOKEN_THRESHOLD: f64 = 0.60;
pub const DEFAULT_SEARCH_CUTOFF: f64 = 0.60;

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weights: ScoringWeights::default(),
            price_tolerance: PriceTolerance::default(),
            fuzzy_token_threshold: DEFAULT_FUZZY_TOKEN_THRESHOLD,
        }
    }
}

/// Demand/sale pair that cleared the threshold
#[derive(Debug, Clone, Copy)]
pub struct MatchPair<'a> {
    pub demand: &'a Listing,
    pub sale: &'a Listing,
    pub score: f64,
}

/// Flat output row consumed by exporters and chat replies
///
/// Field order is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub demand_id: i64,
    pub demand_title: String,
    pub demand_location: Option<String>,
    pub demand_price: Option<f64>,
    pub demand_contact: Option<String>,
    pub sale_id: i64,
    pub sale_title: String,
    pub sale_location: Option<String>,
    pub sale_price: Option<f64>,
    pub sale_contact: Option<String>,
    pub score: f64,
}

impl From<&MatchPair<'_>> for MatchRecord {
    fn from(pair: &MatchPair<'_>) -> Self {
        let (d, s) = (pair.demand, pair.sale);
        Self {
            demand_id: d.id,
            demand_title: d.title.clone(),
            demand_location: d.location.clone(),
            demand_price: d.price.and_then(|p| p.to_f64()),
            demand_contact: d.contact.clone(),
            sale_id: s.id,
            sale_title: s.title.clone(),
            sale_location: s.location.clone(),
            sale_price: s.price.and_then(|p| p.to_f64()),
            sale_contact: s.contact.clone(),
            score: round3(pair.score),
        }
    }
}

/// Listing that matched a title search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleHit {
    pub id: i64,
    pub title: String,
    pub score: f64,
}

/// Round to 3 decimal places, ties to even on the exact binary value
pub fn round3(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .and_then(|d| {
            d.round_dp_with_strategy(3, RoundingStrategy::MidpointNearestEven)
                .to_f64()
        })
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_type_aliases() {
        assert_eq!("Sale".parse::<ListingType>(), Ok(ListingType::Sale));
        assert_eq!("продажа".parse::<ListingType>(), Ok(ListingType::Sale));
        assert_eq!("Спрос".parse::<ListingType>(), Ok(ListingType::Demand));
        assert_eq!("покупка".parse::<ListingType>(), Ok(ListingType::Demand));
        assert_eq!("договор".parse::<ListingType>(), Ok(ListingType::Contract));
        assert!("barter".parse::<ListingType>().is_err());
    }

    #[test]
    fn test_listing_deserialize() {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "ноутбук",
            "type": "спрос",
            "price": "50000.50",
            "characteristics": {"ram": "16gb", "ssd": 512}
        }))
        .unwrap();

        assert_eq!(listing.listing_type, ListingType::Demand);
        assert_eq!(listing.price, Some(Decimal::new(5000050, 2)));
        assert_eq!(listing.characteristics.as_ref().map(|c| c.len()), Some(2));
        assert!(listing.location.is_none());
    }

    #[test]
    fn test_malformed_optional_fields_degrade() {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "id": 1,
            "type": "sale",
            "price": "договорная",
            "characteristics": ["not", "a", "map"]
        }))
        .unwrap();

        assert_eq!(listing.title, "");
        assert!(listing.price.is_none());
        assert!(listing.characteristics.is_none());
    }

    #[test]
    fn test_match_record_fields() {
        let demand = Listing::demand(1, "ноутбук")
            .with_location("Москва")
            .with_price(Decimal::from(50000));
        let sale = Listing::sale(2, "ноутбук Lenovo").with_contact("@seller");
        let pair = MatchPair { demand: &demand, sale: &sale, score: 0.57499 };

        let record = MatchRecord::from(&pair);

        assert_eq!(record.demand_id, 1);
        assert_eq!(record.demand_price, Some(50000.0));
        assert_eq!(record.sale_price, None);
        assert_eq!(record.sale_contact.as_deref(), Some("@seller"));
        assert_eq!(record.score, 0.575);

        let json = serde_json::to_string(&record).unwrap();
        let keys = ["demand_id", "demand_title", "demand_location", "demand_price",
            "demand_contact", "sale_id", "sale_title", "sale_location", "sale_price",
            "sale_contact", "score"];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "field order changed: {}", json);
    }

    #[test]
    fn test_weights_can_score() {
        assert!(ScoringWeights::default().can_score());

        let zero = ScoringWeights { title: 0.0, characteristics: 0.0, location: 0.0, price: 0.0 };
        assert!(!zero.can_score());

        let negative = ScoringWeights { title: -1.0, ..zero };
        assert!(!negative.can_score());
    }

    #[test]
    fn test_round3_ties_to_even() {
        assert_eq!(round3(0.5625), 0.562);
        assert_eq!(round3(0.4375), 0.438);
        assert_eq!(round3(0.0045), 0.004);
        assert_eq!(round3(0.57499), 0.575);
        assert_eq!(round3(1.0), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn test_default_options() {
        let options = MatchOptions::default();
        assert_eq!(options.threshold, 0.45);
        assert_eq!(options.fuzzy_token_threshold, 0.60);
        assert!((options.weights.total() - 1.0).abs() < 1e-12);
        assert!(options.price_tolerance.absolute.is_none());
    }
}
