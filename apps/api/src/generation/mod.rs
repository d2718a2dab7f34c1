// Offer-text generation: validation, prompt construction, the model call and
// hashtag post-processing. All model calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod hashtags;
pub mod prompts;
pub mod validation;
