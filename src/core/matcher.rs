use crate::core::{
    scoring::score_breakdown,
    similarity::{title_similarity, token_set_similarity, TokenSet},
    tokenizer::Tokenizer,
};
use crate::models::{Listing, ListingType, MatchOptions, MatchPair, MatchRecord, TitleHit};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub pairs: Vec<MatchPair<'a>>,
    pub demand_count: usize,
    pub sale_count: usize,
}

impl MatchResult<'_> {
    /// Number of demand/sale pairs that were scored
    pub fn total_pairs(&self) -> usize {
        self.demand_count * self.sale_count
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        self.pairs.iter().map(MatchRecord::from).collect()
    }
}

/// Split a snapshot into demands and sales, both in snapshot order
///
/// Contract listings take no part in matching and are dropped.
pub fn partition_listings(listings: &[Listing]) -> (Vec<&Listing>, Vec<&Listing>) {
    let mut demands = Vec::new();
    let mut sales = Vec::new();
    for listing in listings {
        match listing.listing_type {
            ListingType::Demand => demands.push(listing),
            ListingType::Sale => sales.push(listing),
            ListingType::Contract => {}
        }
    }
    (demands, sales)
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Partition the snapshot into demands and sales
/// 2. Score every demand × sale pair (demands outer, sales inner)
/// 3. Keep pairs scoring at least the threshold
/// 4. Stable sort by score, descending
///
/// Holds no state between calls. The full cross product is scored with no
/// blocking index, which is fine for catalogs of a few thousand listings.
#[derive(Debug, Clone)]
pub struct Matcher {
    options: MatchOptions,
    tokenizer: Tokenizer,
}

impl Matcher {
    pub fn new(options: MatchOptions, tokenizer: Tokenizer) -> Self {
        Self { options, tokenizer }
    }

    pub fn with_default_options() -> Self {
        Self::new(MatchOptions::default(), Tokenizer::default())
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Same tokenizer, different parameters
    pub fn with_options(&self, options: MatchOptions) -> Self {
        Self {
            options,
            tokenizer: self.tokenizer.clone(),
        }
    }

    /// Find demand/sale pairs in a listing snapshot
    ///
    /// # Arguments
    /// * `listings` - Full snapshot; order decides how equal scores are ranked
    ///
    /// # Returns
    /// MatchResult with pairs scoring at least the threshold, best first.
    /// Pairs with equal scores keep their cross-join order.
    pub fn find_matches<'a>(&self, listings: &'a [Listing]) -> MatchResult<'a> {
        let (demands, sales) = partition_listings(listings);

        // Tokenize each title once instead of once per pair
        let demand_tokens: Vec<TokenSet> = demands
            .iter()
            .map(|d| self.tokenizer.token_set(d.title.as_str()))
            .collect();
        let sale_tokens: Vec<TokenSet> = sales
            .iter()
            .map(|s| self.tokenizer.token_set(s.title.as_str()))
            .collect();

        let mut pairs: Vec<MatchPair<'a>> = Vec::new();
        for (&demand, d_tokens) in demands.iter().zip(&demand_tokens) {
            for (&sale, s_tokens) in sales.iter().zip(&sale_tokens) {
                let score = score_breakdown(demand, sale, d_tokens, s_tokens, &self.options)
                    .weighted(&self.options.weights);

                if score >= self.options.threshold {
                    pairs.push(MatchPair { demand, sale, score });
                }
            }
        }

        // Stable: equal scores keep enumeration order
        pairs.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            demands = demands.len(),
            sales = sales.len(),
            kept = pairs.len(),
            threshold = self.options.threshold,
            "Scored listing snapshot"
        );

        MatchResult {
            pairs,
            demand_count: demands.len(),
            sale_count: sales.len(),
        }
    }

    /// Title similarity with this matcher's tokenizer and fuzzy threshold
    pub fn title_similarity<'a, 'b>(
        &self,
        a: impl Into<Option<&'a str>>,
        b: impl Into<Option<&'b str>>,
    ) -> f64 {
        title_similarity(&self.tokenizer, a, b, self.options.fuzzy_token_threshold)
    }

    /// Rank listings by how closely their titles resemble `query`
    ///
    /// Listings of every type are considered. Hits scoring below `cutoff`
    /// are dropped; equal scores keep snapshot order.
    pub fn search_by_title<'a>(
        &self,
        query: &str,
        listings: impl IntoIterator<Item = &'a Listing>,
        cutoff: f64,
    ) -> Vec<TitleHit> {
        let query_tokens = self.tokenizer.token_set(query.trim());

        let mut candidates = 0usize;
        let mut hits: Vec<TitleHit> = listings
            .into_iter()
            .inspect(|_| candidates += 1)
            .filter_map(|listing| {
                let tokens = self.tokenizer.token_set(listing.title.as_str());
                let score = token_set_similarity(
                    &query_tokens,
                    &tokens,
                    self.options.fuzzy_token_threshold,
                );

                if score >= cutoff {
                    Some(TitleHit {
                        id: listing.id,
                        title: listing.title.clone(),
                        score,
                    })
                } else {
                    None
                }
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(query, candidates, hits = hits.len(), "Searched titles");

        hits
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTolerance;
    use rust_decimal::Decimal;

    fn create_snapshot() -> Vec<Listing> {
        vec![
            Listing::demand(1, "ноутбук").with_location("Москва").with_price(Decimal::from(50000)),
            Listing::sale(2, "ноутбук Lenovo").with_location("Москва").with_price(Decimal::from(50200)),
            Listing::new(3, ListingType::Contract, "ноутбук"),
            Listing::sale(4, "принтер HP").with_location("Казань"),
            Listing::demand(5, "принтер").with_location("Казань"),
        ]
    }

    #[test]
    fn test_partition_preserves_order() {
        let snapshot = create_snapshot();
        let (demands, sales) = partition_listings(&snapshot);

        assert_eq!(demands.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(sales.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_find_matches_basic() {
        let options = MatchOptions {
            price_tolerance: PriceTolerance { absolute: Some(Decimal::from(1000)), percent: None },
            ..MatchOptions::default()
        };
        let matcher = Matcher::new(options, Tokenizer::default());
        let snapshot = create_snapshot();

        let result = matcher.find_matches(&snapshot);

        assert_eq!(result.demand_count, 2);
        assert_eq!(result.sale_count, 2);
        assert_eq!(result.total_pairs(), 4);

        let ids: Vec<(i64, i64)> = result.pairs.iter().map(|p| (p.demand.id, p.sale.id)).collect();
        assert_eq!(ids, vec![(1, 2), (5, 4)]);
        assert!(result.pairs.iter().all(|p| p.score >= 0.45));
    }

    #[test]
    fn test_contract_never_matched() {
        let matcher = Matcher::with_default_options().with_options(MatchOptions {
            threshold: 0.0,
            ..MatchOptions::default()
        });
        let snapshot = create_snapshot();

        let result = matcher.find_matches(&snapshot);

        assert_eq!(result.pairs.len(), 4);
        assert!(result.pairs.iter().all(|p| p.demand.id != 3 && p.sale.id != 3));
    }

    #[test]
    fn test_ties_keep_cross_join_order() {
        let matcher = Matcher::with_default_options();
        let snapshot = vec![
            Listing::demand(1, "стол"),
            Listing::demand(2, "стол"),
            Listing::sale(10, "стол"),
            Listing::sale(11, "стол"),
        ];

        let result = matcher.find_matches(&snapshot);

        let ids: Vec<(i64, i64)> = result.pairs.iter().map(|p| (p.demand.id, p.sale.id)).collect();
        assert_eq!(ids, vec![(1, 10), (1, 11), (2, 10), (2, 11)]);
    }

    #[test]
    fn test_threshold_above_max_returns_nothing() {
        let matcher = Matcher::with_default_options().with_options(MatchOptions {
            threshold: 1.1,
            ..MatchOptions::default()
        });
        let snapshot = vec![
            Listing::demand(1, "стол").with_location("Москва").with_price(Decimal::from(10)),
            Listing::sale(2, "стол").with_location("Москва").with_price(Decimal::from(10)),
        ];

        assert!(matcher.find_matches(&snapshot).pairs.is_empty());
    }

    #[test]
    fn test_search_by_title() {
        let matcher = Matcher::with_default_options();
        let snapshot = vec![
            Listing::sale(1, "Принтер HP LaserJet"),
            Listing::demand(2, "ноутбук Lenovo"),
            Listing::new(3, ListingType::Contract, "принтер"),
            Listing::sale(4, "принтеры"),
        ];

        let hits = matcher.search_by_title(" принтер ", &snapshot, 0.6);
        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(hits[0].score, 1.0);

        // "Принтер HP LaserJet" scores 0.5, "принтеры" 0.4375
        let hits = matcher.search_by_title("принтер", &snapshot, 0.4);
        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 1, 4]);
    }
}
