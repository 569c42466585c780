use crate::{inference::InferenceError, prompt::PromptError};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("upstream inference failure: {0}")]
    Inference(#[from] InferenceError),
    #[error("upstream inference timed out after {timeout_ms}ms")]
    Timeout {
        timeout_ms: u64,
    },
    #[error("no audio content produced")]
    NoAudioContent,
    #[error("audio codec not initialized")]
    CodecNotInitialized,
}

impl SynthesisError {
    pub fn kind(&self) -> &'static str {
        match self {
            SynthesisError::InvalidRequest(_) => "invalid_request",
            SynthesisError::Prompt(_) => "prompt",
            SynthesisError::Inference(_) => "upstream_inference",
            SynthesisError::Timeout {
                ..
            } => "upstream_timeout",
            SynthesisError::NoAudioContent => "no_audio_content",
            SynthesisError::CodecNotInitialized => "codec_not_initialized",
        }
    }
}
