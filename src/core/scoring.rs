use crate::core::{
    comparators::{characteristics_similarity, location_similarity, price_similarity},
    similarity::{token_set_similarity, TokenSet},
    tokenizer::Tokenizer,
};
use crate::models::{Listing, MatchOptions, ScoringWeights};

/// Per-attribute similarities of one demand/sale pair, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub title: f64,
    pub characteristics: f64,
    pub location: f64,
    pub price: f64,
}

impl ScoreBreakdown {
    /// Weighted sum:
    /// score = (
    ///     title * w.title +
    ///     characteristics * w.characteristics +
    ///     location * w.location +
    ///     price * w.price
    /// )
    #[inline]
    pub fn weighted(&self, weights: &ScoringWeights) -> f64 {
        weights.title * self.title
            + weights.characteristics * self.characteristics
            + weights.location * self.location
            + weights.price * self.price
    }
}

/// Compare a pair whose titles are already tokenized
pub fn score_breakdown(
    demand: &Listing,
    sale: &Listing,
    demand_tokens: &TokenSet,
    sale_tokens: &TokenSet,
    options: &MatchOptions,
) -> ScoreBreakdown {
    ScoreBreakdown {
        title: token_set_similarity(demand_tokens, sale_tokens, options.fuzzy_token_threshold),
        characteristics: characteristics_similarity(
            demand.characteristics.as_ref(),
            sale.characteristics.as_ref(),
        ),
        location: location_similarity(demand.location.as_deref(), sale.location.as_deref()),
        price: price_similarity(demand.price, sale.price, &options.price_tolerance),
    }
}

/// Score one demand/sale pair
///
/// Lies in `[0, options.weights.total()]`; weights are used as given.
pub fn score_pair(
    demand: &Listing,
    sale: &Listing,
    tokenizer: &Tokenizer,
    options: &MatchOptions,
) -> f64 {
    let demand_tokens = tokenizer.token_set(demand.title.as_str());
    let sale_tokens = tokenizer.token_set(sale.title.as_str());

    score_breakdown(demand, sale, &demand_tokens, &sale_tokens, options).weighted(&options.weights)
}
