use std::{
    num::{NonZeroU16, NonZeroU32},
    time::Duration,
};

pub type Token = u64;

pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const DEFAULT_BIT_DEPTH: u16 = 16;
pub const DEFAULT_CHANNELS: u16 = 1;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("sample_rate must be > 0")]
    InvalidSampleRate,
    #[error("channels must be > 0")]
    InvalidChannelCount,
    #[error("unsupported bit depth {0}, only 16-bit PCM is supported")]
    InvalidBitDepth(u16),
    #[error("audio token cardinality must be > 0")]
    InvalidTokenCardinality,
    #[error("audio token range is empty: min {min} > max {max}")]
    InvalidTokenRange {
        min: Token,
        max: Token,
    },
    #[error("model token {token} at frame position {position} is outside codec range {range_start}..={range_end}")]
    InvalidModelToken {
        token: Token,
        position: usize,
        range_start: Token,
        range_end: Token,
    },
    #[error("pcm block size mismatch: expected {expected_bytes} bytes, got {actual_bytes}")]
    InvalidPcmBlock {
        expected_bytes: usize,
        actual_bytes: usize,
    },
    #[error("audio runtime rejected input: {0}")]
    Runtime(String),
}

pub type AudioResult<T> = Result<T, AudioError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    sample_rate: NonZeroU32,
    bit_depth: u16,
    channels: NonZeroU16,
}

impl AudioFormat {
    pub fn new(
        sample_rate: u32,
        bit_depth: u16,
        channels: u16,
    ) -> AudioResult<Self> {
        let sample_rate = NonZeroU32::new(sample_rate).ok_or(AudioError::InvalidSampleRate)?;
        let channels = NonZeroU16::new(channels).ok_or(AudioError::InvalidChannelCount)?;
        if bit_depth != DEFAULT_BIT_DEPTH {
            return Err(AudioError::InvalidBitDepth(bit_depth));
        }

        Ok(Self {
            sample_rate,
            bit_depth,
            channels,
        })
    }

    pub fn pcm16_mono(sample_rate: u32) -> AudioResult<Self> {
        Self::new(sample_rate, DEFAULT_BIT_DEPTH, DEFAULT_CHANNELS)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.get()
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn channels(&self) -> u16 {
        self.channels.get()
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bit_depth as usize / 8
    }

    pub fn content_type(&self) -> &'static str {
        "audio/pcm"
    }

    pub fn duration_of(
        &self,
        byte_count: usize,
    ) -> Duration {
        let frame_bytes = self.bytes_per_sample() * self.channels() as usize;
        let sample_frames = byte_count / frame_bytes;
        Duration::from_secs_f64(sample_frames as f64 / self.sample_rate() as f64)
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: const { NonZeroU32::new(DEFAULT_SAMPLE_RATE).unwrap() },
            bit_depth: DEFAULT_BIT_DEPTH,
            channels: const { NonZeroU16::new(DEFAULT_CHANNELS).unwrap() },
        }
    }
}

/// PCM produced by decoding a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    frame_index: usize,
    bytes: Box<[u8]>,
}

impl AudioChunk {
    pub fn new(
        frame_index: usize,
        bytes: Box<[u8]>,
    ) -> Self {
        Self {
            frame_index,
            bytes,
        }
    }

    /// Converts float samples in [-1, 1] to signed 16-bit little-endian PCM.
    pub fn from_f32_samples(
        frame_index: usize,
        samples: &[f32],
    ) -> Self {
        let bytes = samples
            .iter()
            .flat_map(|&sample| ((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes())
            .collect::<Vec<_>>();

        Self::new(frame_index, bytes.into_boxed_slice())
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    format: AudioFormat,
    bytes: Vec<u8>,
    decoded_frames: usize,
    failed_frames: usize,
    discarded_tokens: usize,
}

impl AudioStream {
    pub fn assemble(
        format: AudioFormat,
        chunks: Vec<AudioChunk>,
        failed_frames: usize,
        discarded_tokens: usize,
    ) -> Self {
        let total_bytes = chunks.iter().map(AudioChunk::len).sum();
        let mut bytes = Vec::with_capacity(total_bytes);
        for chunk in &chunks {
            bytes.extend_from_slice(chunk.bytes());
        }

        Self {
            format,
            bytes,
            decoded_frames: chunks.len(),
            failed_frames,
            discarded_tokens,
        }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn decoded_frames(&self) -> usize {
        self.decoded_frames
    }

    pub fn failed_frames(&self) -> usize {
        self.failed_frames
    }

    pub fn discarded_tokens(&self) -> usize {
        self.discarded_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn duration(&self) -> Duration {
        self.format.duration_of(self.bytes.len())
    }
}
