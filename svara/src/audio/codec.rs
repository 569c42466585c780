use std::path::PathBuf;

use super::{AudioChunk, AudioFormat, AudioResult, AudioTokenSpace, Frame};

/// Decodes one frame of audio tokens into a fixed-size PCM block.
///
/// Implementations are shared across concurrent requests through an `Arc`. A runtime
/// that cannot be invoked concurrently must serialize calls internally.
pub trait FrameCodec: Send + Sync {
    fn format(&self) -> AudioFormat;

    fn decode_frame(
        &self,
        frame: &Frame,
    ) -> AudioResult<AudioChunk>;
}

#[derive(Debug, thiserror::Error)]
pub enum CodecInitError {
    #[error("codec model not configured")]
    ModelNotConfigured,
    #[error("codec model not found at {0}")]
    ModelNotFound(PathBuf),
    #[error("codec runtime `{0}` is not compiled into this build")]
    RuntimeUnavailable(&'static str),
    #[error("unable to load codec runtime: {0}")]
    Runtime(String),
}

/// Hierarchical SNAC codes carried by a single frame: one coarse code, two middle codes
/// and four fine codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnacCodes {
    pub coarse: [u32; 1],
    pub middle: [u32; 2],
    pub fine: [u32; 4],
}

impl SnacCodes {
    pub fn from_frame(
        frame: &Frame,
        token_space: &AudioTokenSpace,
    ) -> AudioResult<Self> {
        let mut codes = [0u32; 7];
        for (position, (&token, code)) in frame.tokens().iter().zip(codes.iter_mut()).enumerate() {
            *code = token_space.map_model_to_codec(position, token)?;
        }

        Ok(Self {
            coarse: [codes[0]],
            middle: [codes[1], codes[4]],
            fine: [codes[2], codes[3], codes[5], codes[6]],
        })
    }

    pub fn levels(&self) -> [&[u32]; 3] {
        [&self.coarse, &self.middle, &self.fine]
    }
}

/// Resolves the codec configured for this process.
///
/// Called once at startup; the returned codec is handed to request handlers explicitly.
#[cfg(feature = "onnx")]
pub fn load_codec(
    model_path: Option<&std::path::Path>,
    token_space: AudioTokenSpace,
    format: AudioFormat,
) -> Result<std::sync::Arc<dyn FrameCodec>, CodecInitError> {
    let model_path = model_path.ok_or(CodecInitError::ModelNotConfigured)?;
    let codec = super::SnacOnnxCodec::load(model_path, token_space, format)?;
    Ok(std::sync::Arc::new(codec))
}

#[cfg(not(feature = "onnx"))]
pub fn load_codec(
    model_path: Option<&std::path::Path>,
    _token_space: AudioTokenSpace,
    _format: AudioFormat,
) -> Result<std::sync::Arc<dyn FrameCodec>, CodecInitError> {
    let model_path = model_path.ok_or(CodecInitError::ModelNotConfigured)?;
    if !model_path.exists() {
        return Err(CodecInitError::ModelNotFound(model_path.to_path_buf()));
    }
    Err(CodecInitError::RuntimeUnavailable("onnx"))
}
