// Strategic foresight scan: prompt building, backend fallback, extraction of
// opportunity records and report rendering.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod document;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
