use serde::Deserialize;

use super::SynthesisError;
use crate::voice::DEFAULT_VOICE;

pub const MIN_TEXT_CHARS: usize = 1;
pub const MAX_TEXT_CHARS: usize = 500;
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_speed() -> f32 {
    1.0
}

/// One text-to-speech call. `speed` is validated but only carried as a hint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: default_voice(),
            speed: default_speed(),
        }
    }

    pub fn voice(
        mut self,
        voice: impl Into<String>,
    ) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn speed(
        mut self,
        speed: f32,
    ) -> Self {
        self.speed = speed;
        self
    }

    pub fn validate(&self) -> Result<(), SynthesisError> {
        let text_chars = self.text.chars().count();
        if !(MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&text_chars) {
            return Err(SynthesisError::InvalidRequest(format!(
                "text must be between {MIN_TEXT_CHARS} and {MAX_TEXT_CHARS} characters, got {text_chars}"
            )));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(SynthesisError::InvalidRequest(format!(
                "speed must be between {MIN_SPEED} and {MAX_SPEED}, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}
