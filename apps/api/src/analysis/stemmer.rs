//! Stemmer adapter. Stems are compared, never shown.

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

static ENGLISH_STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Reduces `token` to its Snowball English stem.
pub fn stem(token: &str) -> String {
    ENGLISH_STEMMER.stem(token).into_owned()
}
