use serde::Serialize;

pub const DEFAULT_MAX_TOKENS: u32 = 2_048;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationParameters {
    pub fn new(
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
    ) -> Self {
        Self {
            max_tokens,
            temperature,
            top_p,
        }
    }

    pub fn max_tokens(
        mut self,
        max_tokens: u32,
    ) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(
        mut self,
        temperature: f32,
    ) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn top_p(
        mut self,
        top_p: f32,
    ) -> Self {
        self.top_p = top_p;
        self
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P)
    }
}

/// Body of an OpenAI-compatible `/v1/completions` call.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub return_token_ids: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(
        model: &'a str,
        prompt: &'a str,
        parameters: &GenerationParameters,
    ) -> Self {
        Self {
            model,
            prompt,
            max_tokens: parameters.max_tokens,
            temperature: parameters.temperature,
            top_p: parameters.top_p,
            return_token_ids: true,
        }
    }
}
