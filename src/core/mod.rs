// Core algorithm exports
pub mod comparators;
pub mod distance;
pub mod matcher;
pub mod scoring;
pub mod similarity;
pub mod tokenizer;

pub use comparators::{characteristics_similarity, location_similarity, price_similarity};
pub use distance::{edit_distance, normalized_similarity};
pub use matcher::{partition_listings, MatchResult, Matcher};
pub use scoring::{score_breakdown, score_pair, ScoreBreakdown};
pub use similarity::{
    fuzzy_token_similarity, jaccard_similarity, title_similarity, token_set_similarity, TokenSet,
};
pub use tokenizer::{
    DictionaryLemmatizer, LemmaDictionaryError, Lemmatizer, NoopLemmatizer, Tokenizer, STOP_WORDS,
};
