//! Listing Match - demand/sale matching engine for a listings catalog
//!
//! Scores every demand × sale pair of a listing snapshot on title, characteristics,
//! location and price similarity, then returns the pairs clearing a threshold,
//! best first. The engine is pure: it reads a snapshot and keeps no state.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    edit_distance, normalized_similarity, partition_listings, score_pair, title_similarity,
    DictionaryLemmatizer, Lemmatizer, MatchResult, Matcher, NoopLemmatizer, Tokenizer,
};
pub use models::{
    Listing, ListingType, MatchOptions, MatchPair, MatchRecord, PriceTolerance, ScoringWeights,
    TitleHit,
};
