mod codec;
mod decoder;
mod frame;
#[cfg(feature = "onnx")]
mod snac_onnx;
mod token_space;
mod types;

pub use codec::{CodecInitError, FrameCodec, SnacCodes, load_codec};
pub use decoder::{DEFAULT_DECODE_PARALLELISM, DecodeError, DecodeSummary, FrameDecoder};
pub use frame::{FRAME_SIZE, Frame, discarded_tail, window};
#[cfg(feature = "onnx")]
pub use snac_onnx::{SNAC_SAMPLES_PER_FRAME, SnacOnnxCodec};
pub use token_space::{AudioTokenRange, AudioTokenSpace, DEFAULT_AUDIO_TOKEN_OFFSET, DEFAULT_CODEBOOK_SIZE};
pub use types::{
    AudioChunk, AudioError, AudioFormat, AudioResult, AudioStream, DEFAULT_BIT_DEPTH, DEFAULT_CHANNELS,
    DEFAULT_SAMPLE_RATE, Token,
};
