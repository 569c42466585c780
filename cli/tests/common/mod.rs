#![allow(dead_code)]
use std::sync::Arc;

use async_trait::async_trait;
use cli::server::{ServiceState, build_rocket};
use rocket::{
    Config,
    config::LogLevel,
    local::asynchronous::Client,
};
use svara::{
    audio::{AudioChunk, AudioError, AudioFormat, AudioResult, Frame, FrameCodec},
    config::ServiceConfig,
    inference::{GenerationParameters, InferenceError, TokenGenerator, UpstreamHealth},
};

pub const AUDIO_OFFSET: u64 = 128_266;

pub struct FixedGenerator {
    pub response: Result<Vec<u64>, InferenceError>,
    pub health: UpstreamHealth,
}

impl FixedGenerator {
    pub fn tokens(tokens: Vec<u64>) -> Self {
        Self {
            response: Ok(tokens),
            health: UpstreamHealth::Healthy,
        }
    }

    pub fn failing(error: InferenceError) -> Self {
        Self {
            response: Err(error),
            health: UpstreamHealth::Unreachable,
        }
    }
}

#[async_trait]
impl TokenGenerator for FixedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _parameters: &GenerationParameters,
    ) -> Result<Vec<u64>, InferenceError> {
        self.response.clone()
    }

    async fn health(&self) -> UpstreamHealth {
        self.health
    }
}

/// Two bytes per frame: the frame index and the low byte of its first token. Frames
/// with index `fail_index` are rejected.
pub struct IndexCodec {
    pub fail_index: Option<usize>,
}

impl FrameCodec for IndexCodec {
    fn format(&self) -> AudioFormat {
        AudioFormat::default()
    }

    fn decode_frame(
        &self,
        frame: &Frame,
    ) -> AudioResult<AudioChunk> {
        if self.fail_index == Some(frame.index()) {
            return Err(AudioError::Runtime("unsupported token combination".into()));
        }
        let head = frame.tokens()[0] as u8;
        Ok(AudioChunk::new(frame.index(), vec![frame.index() as u8, head].into_boxed_slice()))
    }
}

/// `frames` complete frames of in-range tokens, wrapped in text tokens.
pub fn audio_tokens(frames: usize) -> Vec<u64> {
    let mut tokens = vec![1, 2, 3];
    tokens.extend((0..(frames * 7) as u64).map(|position| AUDIO_OFFSET + position));
    tokens.push(128_009);
    tokens
}

pub async fn client(
    generator: FixedGenerator,
    codec: Option<Arc<dyn FrameCodec>>,
) -> Client {
    let config = ServiceConfig::default();
    let state = ServiceState::new(config, Arc::new(generator), codec);
    let rocket_config = Config {
        log_level: LogLevel::Off,
        ..Config::debug_default()
    };
    Client::tracked(build_rocket(state, rocket_config)).await.expect("valid rocket instance")
}
