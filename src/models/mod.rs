// Model exports
pub mod domain;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{
    Listing, ListingType, ListingTypeError, MatchOptions, MatchPair, MatchRecord,
    PriceTolerance, ScoringWeights, TitleHit, DEFAULT_FUZZY_TOKEN_THRESHOLD,
    DEFAULT_SEARCH_CUTOFF, DEFAULT_THRESHOLD,
};
pub use requests::{FindMatchesRequest, SearchListingsRequest, TitleSimilarityRequest, WeightsOverride};
pub use responses::{
    ErrorResponse, FindMatchesResponse, HealthResponse, SearchListingsResponse,
    TitleSimilarityResponse,
};
