use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Unicode word runs: letters of any script, digits, underscore
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Words that carry no signal for listing titles
pub const STOP_WORDS: [&str; 19] = [
    // Prepositions and conjunctions
    "и", "или", "для", "на", "в", "из", "с", "к", "по", "от", "до",
    // Units
    "шт", "штук", "штуки",
    // Condition and urgency
    "б/у", "бу", "новый", "новые", "срочно",
];

#[inline]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Reduces a word form to its canonical form
pub trait Lemmatizer: Send + Sync {
    /// Canonical form of `token`, or `None` when the token is unknown
    fn lemmatize(&self, token: &str) -> Option<String>;
}

/// Lemmatizer used when no linguistic data is available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLemmatizer;

impl Lemmatizer for NoopLemmatizer {
    fn lemmatize(&self, _token: &str) -> Option<String> {
        None
    }
}

/// Errors that can occur while loading a lemma dictionary
#[derive(Debug, Error)]
pub enum LemmaDictionaryError {
    #[error("Failed to read lemma dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid lemma dictionary: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct LemmaFile {
    #[serde(default)]
    lemmas: HashMap<String, String>,
}

/// Word-form lookup table
///
/// Loaded from TOML with a single `[lemmas]` table:
///
/// ```toml
/// [lemmas]
/// "ноутбуки" = "ноутбук"
/// "ноутбука" = "ноутбук"
/// ```
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    lemmas: HashMap<String, String>,
}

impl DictionaryLemmatizer {
    pub fn new(lemmas: HashMap<String, String>) -> Self {
        let lemmas = lemmas
            .into_iter()
            .map(|(form, lemma)| (form.to_lowercase(), lemma.to_lowercase()))
            .collect();
        Self { lemmas }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, LemmaDictionaryError> {
        let file: LemmaFile = toml::from_str(source)?;
        Ok(Self::new(file.lemmas))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LemmaDictionaryError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, token: &str) -> Option<String> {
        self.lemmas.get(token).cloned()
    }
}

/// Free text to canonical token sequence
///
/// Lower-cases, splits into word runs, drops stop words, then lemmatizes
/// each surviving token. Cheap to clone; the lemmatizer is shared.
#[derive(Clone)]
pub struct Tokenizer {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl Tokenizer {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    pub fn with_lemmatizer<L: Lemmatizer + 'static>(lemmatizer: L) -> Self {
        Self::new(Arc::new(lemmatizer))
    }

    /// Tokenize `text`; `None` and `""` both yield no tokens
    pub fn tokenize<'a>(&self, text: impl Into<Option<&'a str>>) -> Vec<String> {
        let text: Option<&str> = text.into();
        let Some(text) = text else {
            return Vec::new();
        };
        let lowered = text.to_lowercase();

        WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .map(|token| {
                self.lemmatizer
                    .lemmatize(token)
                    .unwrap_or_else(|| token.to_string())
            })
            .collect()
    }

    /// Unique tokens of `text` in a fixed order
    pub fn token_set<'a>(&self, text: impl Into<Option<&'a str>>) -> BTreeSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::with_lemmatizer(NoopLemmatizer)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer").finish_non_exhaustive()
    }
}
