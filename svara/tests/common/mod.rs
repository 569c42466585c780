#![allow(dead_code)]
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use svara::{
    audio::{AudioChunk, AudioError, AudioFormat, AudioResult, AudioTokenRange, Frame, FrameCodec, FrameDecoder},
    inference::{GenerationParameters, InferenceError, TokenGenerator, UpstreamHealth},
    synthesis::Synthesizer,
};

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns a fixed token stream after an optional delay and records every prompt.
pub struct ScriptedGenerator {
    response: Result<Vec<u64>, InferenceError>,
    delay: Duration,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn tokens(tokens: Vec<u64>) -> Self {
        Self::new(Ok(tokens), Duration::ZERO)
    }

    pub fn failing(error: InferenceError) -> Self {
        Self::new(Err(error), Duration::ZERO)
    }

    pub fn new(
        response: Result<Vec<u64>, InferenceError>,
        delay: Duration,
    ) -> Self {
        Self {
            response,
            delay,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TokenGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _parameters: &GenerationParameters,
    ) -> Result<Vec<u64>, InferenceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }

    async fn health(&self) -> UpstreamHealth {
        UpstreamHealth::Healthy
    }
}

/// Emits the first token of each frame as four little-endian bytes and fails any frame
/// whose first token is poisoned.
pub struct EchoCodec {
    poisoned: HashSet<u64>,
    pub decoded: Mutex<Vec<Frame>>,
}

impl EchoCodec {
    pub fn new() -> Self {
        Self::poisoned(std::iter::empty())
    }

    pub fn poisoned(tokens: impl IntoIterator<Item = u64>) -> Self {
        Self {
            poisoned: tokens.into_iter().collect(),
            decoded: Mutex::new(Vec::new()),
        }
    }
}

impl FrameCodec for EchoCodec {
    fn format(&self) -> AudioFormat {
        AudioFormat::default()
    }

    fn decode_frame(
        &self,
        frame: &Frame,
    ) -> AudioResult<AudioChunk> {
        self.decoded.lock().unwrap().push(*frame);
        let head = frame.tokens()[0];
        if self.poisoned.contains(&head) {
            return Err(AudioError::Runtime(format!("poisoned frame starting with {head}")));
        }
        Ok(AudioChunk::new(frame.index(), (head as u32).to_le_bytes().to_vec().into_boxed_slice()))
    }
}

pub fn echo_bytes(heads: &[u64]) -> Vec<u8> {
    heads.iter().flat_map(|&head| (head as u32).to_le_bytes()).collect()
}

pub fn synthesizer(
    generator: Arc<dyn TokenGenerator>,
    codec: Arc<dyn FrameCodec>,
    range: AudioTokenRange,
    parallelism: usize,
) -> Synthesizer {
    Synthesizer::new(generator, FrameDecoder::new(codec, parallelism), range, TEST_TIMEOUT)
}
