// Practice rounds: article generation/analysis, offset annotation, scoring, hints.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod hints;
pub mod offsets;
pub mod prompts;
pub mod scoring;
