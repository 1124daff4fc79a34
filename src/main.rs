use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use listing_match::config::Settings;
use listing_match::routes::{self, handle_query_payload_error, json_config, AppState};
use listing_match::{DictionaryLemmatizer, Matcher, Tokenizer};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Set up the global subscriber; RUST_LOG wins over the configured level
fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

/// Tokenizer with the configured lemma dictionary, if one loads
fn build_tokenizer(dictionary: Option<&str>) -> Tokenizer {
    let Some(path) = dictionary else {
        return Tokenizer::default();
    };

    match DictionaryLemmatizer::from_file(path) {
        Ok(lemmatizer) => {
            info!("Loaded {} lemmas from {}", lemmatizer.len(), path);
            Tokenizer::with_lemmatizer(lemmatizer)
        }
        Err(e) => {
            warn!("Failed to load lemma dictionary {} ({}), tokens will not be lemmatized", path, e);
            Tokenizer::default()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not configured yet
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting listing matching service...");
    info!("Configuration loaded successfully");

    let tokenizer = build_tokenizer(settings.tokenizer.lemma_dictionary.as_deref());
    let options = settings.match_options();

    if !options.weights.can_score() {
        error!("Scoring weights sum to zero or less, no pair can clear a positive threshold");
    }

    let matcher = Matcher::new(options, tokenizer);

    info!("Matcher initialized with options: {:?}", options);

    // Build application state
    let app_state = AppState {
        matcher,
        search_cutoff: settings.matching.search_cutoff,
        timeout: Duration::from_millis(settings.matching.timeout_ms),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let payload_limit = settings.server.max_payload_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config(payload_limit))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
