use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::models::{
    MatchOptions, PriceTolerance, ScoringWeights, DEFAULT_FUZZY_TOKEN_THRESHOLD,
    DEFAULT_SEARCH_CUTOFF, DEFAULT_THRESHOLD,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub tokenizer: TokenizerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Largest accepted JSON body; a snapshot carries the whole catalog
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_max_payload_bytes() -> usize { 16 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_fuzzy_token_threshold")]
    pub fuzzy_token_threshold: f64,
    #[serde(default = "default_search_cutoff")]
    pub search_cutoff: f64,
    pub price_tolerance_abs: Option<Decimal>,
    pub price_tolerance_pct: Option<Decimal>,
    /// Deadline for one matching call in the service
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            fuzzy_token_threshold: default_fuzzy_token_threshold(),
            search_cutoff: default_search_cutoff(),
            price_tolerance_abs: None,
            price_tolerance_pct: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_threshold() -> f64 { DEFAULT_THRESHOLD }
fn default_fuzzy_token_threshold() -> f64 { DEFAULT_FUZZY_TOKEN_THRESHOLD }
fn default_search_cutoff() -> f64 { DEFAULT_SEARCH_CUTOFF }
fn default_timeout_ms() -> u64 { 10_000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_title_weight")]
    pub title: f64,
    #[serde(default = "default_characteristics_weight")]
    pub characteristics: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            title: default_title_weight(),
            characteristics: default_characteristics_weight(),
            location: default_location_weight(),
            price: default_price_weight(),
        }
    }
}

fn default_title_weight() -> f64 { 0.60 }
fn default_characteristics_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.15 }
fn default_price_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenizerSettings {
    /// TOML file with a `[lemmas]` table; without it tokens are not lemmatized
    pub lemma_dictionary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LISTING_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LISTING_MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LISTING_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LISTING_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Engine parameters described by this configuration
    pub fn match_options(&self) -> MatchOptions {
        let weights = &self.scoring.weights;
        MatchOptions {
            threshold: self.matching.threshold,
            weights: ScoringWeights {
                title: weights.title,
                characteristics: weights.characteristics,
                location: weights.location,
                price: weights.price,
            },
            price_tolerance: PriceTolerance {
                absolute: self.matching.price_tolerance_abs,
                percent: self.matching.price_tolerance_pct,
            },
            fuzzy_token_threshold: self.matching.fuzzy_token_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.title, 0.60);
        assert_eq!(weights.characteristics, 0.20);
        assert_eq!(weights.location, 0.15);
        assert_eq!(weights.price, 0.05);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_settings_match_engine_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.match_options(), MatchOptions::default());
        assert_eq!(settings.matching.search_cutoff, 0.60);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [matching]
            threshold = 0.3
            price_tolerance_abs = 1000

            [scoring.weights]
            title = 0.7

            [tokenizer]
            lemma_dictionary = "config/lemmas.toml"
            "#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        let options = settings.match_options();

        assert_eq!(options.threshold, 0.3);
        assert_eq!(options.weights.title, 0.7);
        assert_eq!(options.weights.location, 0.15);
        assert_eq!(options.price_tolerance.absolute, Some(Decimal::from(1000)));
        assert_eq!(options.fuzzy_token_threshold, 0.60);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.tokenizer.lemma_dictionary.as_deref(), Some("config/lemmas.toml"));
    }
}
