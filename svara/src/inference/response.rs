use serde::Deserialize;

use super::InferenceError;
use crate::audio::Token;

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub token_ids: Option<Vec<Token>>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        serde_json::from_slice(bytes).map_err(|error| InferenceError::MalformedResponse(error.to_string()))
    }

    /// Token IDs of the first choice. Their absence is a serving configuration problem
    /// rather than a transient failure.
    pub fn into_token_ids(self) -> Result<Vec<Token>, InferenceError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::MalformedResponse("response has no choices".into()))?;

        match choice.token_ids {
            Some(token_ids) if !token_ids.is_empty() => Ok(token_ids),
            _ => Err(InferenceError::MissingTokenIds),
        }
    }
}
