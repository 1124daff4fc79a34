use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchRecord, TitleHit};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub run_id: String,
    pub matches: Vec<MatchRecord>,
    pub demand_count: usize,
    pub sale_count: usize,
    pub total_pairs: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Response for title similarity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSimilarityResponse {
    pub score: f64,
}

/// Response for listing search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchListingsResponse {
    pub results: Vec<TitleHit>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
