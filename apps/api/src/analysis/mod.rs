// Resume analysis engine.
// Implements: keyword extraction, stemmed matching, suggestions, AI analysis
// with keyword fallback. All LLM calls go through llm_client.

pub mod ai_provider;
pub mod engine;
pub mod handlers;
pub mod lexicon;
pub mod matcher;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod stemmer;
pub mod suggestions;
