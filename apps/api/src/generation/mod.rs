// Project generation: request building and the single generation call.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod request_builder;
