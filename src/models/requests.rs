use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Listing, ListingType, MatchOptions, PriceTolerance};
use crate::models::lenient;

/// Partial weight override; omitted weights keep their configured value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeightsOverride {
    pub title: Option<f64>,
    pub characteristics: Option<f64>,
    pub location: Option<f64>,
    pub price: Option<f64>,
}

/// Request to match a listing snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesRequest {
    #[serde(default)]
    pub listings: Vec<Listing>,
    pub threshold: Option<f64>,
    #[serde(default)]
    pub weights: WeightsOverride,
    #[serde(default, deserialize_with = "lenient::decimal_or_none")]
    pub price_tolerance_abs: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_or_none")]
    pub price_tolerance_pct: Option<Decimal>,
    pub fuzzy_token_threshold: Option<f64>,
}

impl FindMatchesRequest {
    /// Layer the request's parameters over the configured defaults
    ///
    /// When the request carries either tolerance, both configured tolerances
    /// are replaced.
    pub fn options(&self, base: &MatchOptions) -> MatchOptions {
        let w = &self.weights;
        let mut options = *base;
        options.threshold = self.threshold.unwrap_or(base.threshold);
        options.weights.title = w.title.unwrap_or(base.weights.title);
        options.weights.characteristics =
            w.characteristics.unwrap_or(base.weights.characteristics);
        options.weights.location = w.location.unwrap_or(base.weights.location);
        options.weights.price = w.price.unwrap_or(base.weights.price);
        if self.price_tolerance_abs.is_some() || self.price_tolerance_pct.is_some() {
            options.price_tolerance = PriceTolerance {
                absolute: self.price_tolerance_abs,
                percent: self.price_tolerance_pct,
            };
        }
        options.fuzzy_token_threshold = self
            .fuzzy_token_threshold
            .unwrap_or(base.fuzzy_token_threshold);
        options
    }
}

/// Request to score two titles against each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSimilarityRequest {
    #[serde(default)]
    pub a: Option<String>,
    #[serde(default)]
    pub b: Option<String>,
    pub fuzzy_token_threshold: Option<f64>,
}

/// Request to rank listings by title similarity to a query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchListingsRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[serde(default)]
    pub listings: Vec<Listing>,
    pub cutoff: Option<f64>,
    pub fuzzy_token_threshold: Option<f64>,
    /// Only listings in this exact location
    #[serde(default)]
    pub location: Option<String>,
    /// Only listings of this type; aliases are accepted
    #[serde(default, rename = "type")]
    pub listing_type: Option<ListingType>,
}

impl SearchListingsRequest {
    /// Listings that pass the location and type filters, in snapshot order
    pub fn candidates(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.listings.iter().filter(move |listing| {
            let location_ok = match self.location.as_deref() {
                Some(location) => listing.location.as_deref() == Some(location),
                None => true,
            };
            let type_ok = self
                .listing_type
                .map_or(true, |listing_type| listing.listing_type == listing_type);
            location_ok && type_ok
        })
    }
}
