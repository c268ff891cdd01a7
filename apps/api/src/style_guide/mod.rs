// Style guide intake: summarizes a user's guide into prescriptive rules.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod prompts;
pub mod summarizer;
