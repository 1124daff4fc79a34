use actix_web::{web, HttpResponse, Responder};
use std::time::Duration;
use validator::Validate;

use crate::core::{title_similarity, Matcher};
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse,
    SearchListingsRequest, SearchListingsResponse, TitleSimilarityRequest,
    TitleSimilarityResponse,
};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub search_cutoff: f64,
    pub timeout: Duration,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/similarity/title", web::post().to(title_similarity_score))
        .route("/listings/search", web::post().to(search_listings));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "listings": [{"id": 1, "type": "demand", "title": "string", "price": 100}],
///   "threshold": 0.45,
///   "weights": {"title": 0.6, "characteristics": 0.2, "location": 0.15, "price": 0.05},
///   "price_tolerance_abs": "1000",
///   "price_tolerance_pct": 5,
///   "fuzzy_token_threshold": 0.6
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    let request = req.into_inner();
    let options = request.options(state.matcher.options());
    let matcher = state.matcher.with_options(options);
    let listings = request.listings;

    let run_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("find_matches", run_id = %run_id);
    tracing::info!(parent: &span, listings = listings.len(), threshold = options.threshold, "Finding matches");

    // Scoring is CPU-bound; keep it off the async workers
    let worker_span = span.clone();
    let job = web::block(move || {
        let _entered = worker_span.enter();
        let result = matcher.find_matches(&listings);
        (result.records(), result.demand_count, result.sale_count, result.total_pairs())
    });

    match tokio::time::timeout(state.timeout, job).await {
        Ok(Ok((matches, demand_count, sale_count, total_pairs))) => {
            tracing::info!(
                parent: &span,
                matches = matches.len(),
                total_pairs,
                "Returning matches"
            );
            HttpResponse::Ok().json(FindMatchesResponse {
                run_id,
                matches,
                demand_count,
                sale_count,
                total_pairs,
                generated_at: chrono::Utc::now(),
            })
        }
        Ok(Err(e)) => {
            tracing::error!(parent: &span, "Matching worker failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
        Err(_) => {
            // The worker is not interrupted; its result is discarded
            let timeout_ms = state.timeout.as_millis();
            tracing::warn!(parent: &span, "Matching timed out after {} ms", timeout_ms);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Matching timed out".to_string(),
                message: format!("No result within {} ms", timeout_ms),
                status_code: 503,
            })
        }
    }
}

/// Title similarity endpoint
///
/// POST /api/v1/similarity/title
///
/// Request body:
/// ```json
/// {"a": "string", "b": "string", "fuzzy_token_threshold": 0.6}
/// ```
async fn title_similarity_score(
    state: web::Data<AppState>,
    req: web::Json<TitleSimilarityRequest>,
) -> impl Responder {
    let threshold = req
        .fuzzy_token_threshold
        .unwrap_or(state.matcher.options().fuzzy_token_threshold);

    let score = title_similarity(
        state.matcher.tokenizer(),
        req.a.as_deref(),
        req.b.as_deref(),
        threshold,
    );

    HttpResponse::Ok().json(TitleSimilarityResponse { score })
}

/// Search listings by title endpoint
///
/// POST /api/v1/listings/search
///
/// Request body:
/// ```json
/// {"query": "string", "listings": [], "cutoff": 0.6, "fuzzy_token_threshold": 0.6,
///  "location": "string", "type": "sale"}
/// ```
async fn search_listings(
    state: web::Data<AppState>,
    req: web::Json<SearchListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let cutoff = req.cutoff.unwrap_or(state.search_cutoff);
    let mut options = *state.matcher.options();
    if let Some(threshold) = req.fuzzy_token_threshold {
        options.fuzzy_token_threshold = threshold;
    }

    let results = state
        .matcher
        .with_options(options)
        .search_by_title(&req.query, req.candidates(), cutoff);

    tracing::info!(
        "Search {:?} matched {} of {} listings",
        req.query,
        results.len(),
        req.listings.len()
    );

    HttpResponse::Ok().json(SearchListingsResponse {
        total: results.len(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
