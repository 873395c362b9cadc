// Résumé analysis: prompt building, the model round-trip, reply interpretation
// and batch export. All model calls go through llm_client.

pub mod analyzer;
pub mod export;
pub mod handlers;
pub mod interpreter;
pub mod prompts;
