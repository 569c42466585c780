mod error;
mod request;
mod synthesizer;

pub use error::SynthesisError;
pub use request::{MAX_SPEED, MAX_TEXT_CHARS, MIN_SPEED, MIN_TEXT_CHARS, SynthesisRequest};
pub use synthesizer::Synthesizer;
