use std::collections::BTreeSet;

use crate::core::{distance::normalized_similarity, tokenizer::Tokenizer};

/// Token set in a fixed iteration order
///
/// Ordered sets keep floating-point sums identical across runs.
pub type TokenSet = BTreeSet<String>;

/// |A ∩ B| / |A ∪ B|, or 0.0 when both sets are empty
#[inline]
pub fn jaccard_similarity(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    a.intersection(b).count() as f64 / union as f64
}

/// Average over `x` of each token's best edit-distance match in `y`
///
/// Best matches below `min_token_similarity` count as 0.
fn best_match_average(x: &TokenSet, y: &TokenSet, min_token_similarity: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }

    let total: f64 = x
        .iter()
        .map(|tx| {
            let best = y
                .iter()
                .map(|ty| normalized_similarity(tx, ty))
                .fold(0.0, f64::max);
            if best >= min_token_similarity {
                best
            } else {
                0.0
            }
        })
        .sum();

    total / x.len() as f64
}

/// Symmetric greedy best-match alignment of two token sets
///
/// Rewards near-duplicate or reordered wording without requiring exact
/// overlap. Returns 0.0 when both sets are empty.
pub fn fuzzy_token_similarity(a: &TokenSet, b: &TokenSet, min_token_similarity: f64) -> f64 {
    0.5 * best_match_average(a, b, min_token_similarity)
        + 0.5 * best_match_average(b, a, min_token_similarity)
}

/// Title similarity over pre-tokenized sets: half Jaccard, half fuzzy alignment
#[inline]
pub fn token_set_similarity(a: &TokenSet, b: &TokenSet, fuzzy_token_threshold: f64) -> f64 {
    0.5 * jaccard_similarity(a, b) + 0.5 * fuzzy_token_similarity(a, b, fuzzy_token_threshold)
}

/// Similarity of two free-text titles in [0, 1]
///
/// Symmetric; a title with at least one surviving token scores 1.0 against
/// itself. Missing titles tokenize to nothing and score 0.0.
pub fn title_similarity<'a, 'b>(
    tokenizer: &Tokenizer,
    a: impl Into<Option<&'a str>>,
    b: impl Into<Option<&'b str>>,
    fuzzy_token_threshold: f64,
) -> f64 {
    let tokens_a = tokenizer.token_set(a);
    let tokens_b = tokenizer.token_set(b);
    token_set_similarity(&tokens_a, &tokens_b, fuzzy_token_threshold)
}
