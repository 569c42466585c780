mod client;
mod error;
mod request;
mod response;

pub use client::{TokenGenerator, UpstreamHealth, VllmClient};
pub use error::InferenceError;
pub use request::{CompletionRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationParameters};
pub use response::{CompletionChoice, CompletionResponse};
