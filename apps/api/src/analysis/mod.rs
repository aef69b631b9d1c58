// Lead analysis: prompt building, completion parsing, score tiers, batch runs.
// All completion calls go through llm_client — no direct OpenAI calls here.

pub mod batch;
pub mod handlers;
pub mod models;
pub mod prompt_builder;
pub mod prompts;
pub mod response_parser;
pub mod score;
