use std::{
    any::Any,
    num::NonZeroUsize,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use futures::{StreamExt, stream};

use super::{AudioChunk, AudioError, AudioFormat, Frame, FrameCodec};

pub const DEFAULT_DECODE_PARALLELISM: usize = 1;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("frame {frame_index} failed to decode: {reason}")]
pub struct DecodeError {
    pub frame_index: usize,
    pub reason: AudioError,
}

/// Result of decoding every frame of one request: chunks of the frames that decoded, in
/// frame order, and the failures of the frames that were skipped.
#[derive(Debug, Default)]
pub struct DecodeSummary {
    chunks: Vec<AudioChunk>,
    failures: Vec<DecodeError>,
}

impl DecodeSummary {
    fn absorb(
        mut self,
        result: Result<AudioChunk, DecodeError>,
    ) -> Self {
        match result {
            Ok(chunk) => self.chunks.push(chunk),
            Err(error) => {
                log::warn!("skipping frame {}: {}", error.frame_index, error.reason);
                self.failures.push(error);
            },
        }
        self
    }

    pub fn chunks(&self) -> &[AudioChunk] {
        &self.chunks
    }

    pub fn failures(&self) -> &[DecodeError] {
        &self.failures
    }

    pub fn attempted(&self) -> usize {
        self.chunks.len() + self.failures.len()
    }

    pub fn into_parts(self) -> (Vec<AudioChunk>, Vec<DecodeError>) {
        (self.chunks, self.failures)
    }
}

#[derive(Clone)]
pub struct FrameDecoder {
    codec: Arc<dyn FrameCodec>,
    parallelism: NonZeroUsize,
}

impl FrameDecoder {
    pub fn new(
        codec: Arc<dyn FrameCodec>,
        parallelism: usize,
    ) -> Self {
        Self {
            codec,
            parallelism: NonZeroUsize::new(parallelism).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn format(&self) -> AudioFormat {
        self.codec.format()
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism.get()
    }

    /// Decodes a single frame. Both codec errors and codec panics come back as a
    /// `DecodeError` tagged with the frame index.
    pub fn decode_frame(
        &self,
        frame: &Frame,
    ) -> Result<AudioChunk, DecodeError> {
        let frame_index = frame.index();
        let codec = self.codec.as_ref();

        match catch_unwind(AssertUnwindSafe(|| codec.decode_frame(frame))) {
            Ok(Ok(chunk)) => Ok(chunk),
            Ok(Err(reason)) => Err(DecodeError {
                frame_index,
                reason,
            }),
            Err(payload) => Err(DecodeError {
                frame_index,
                reason: AudioError::Runtime(format!("codec panicked: {}", panic_message(payload.as_ref()))),
            }),
        }
    }

    /// Decodes frames on the blocking pool with at most `parallelism` in flight. Results
    /// are folded in frame order regardless of completion order.
    pub async fn decode_frames(
        &self,
        frames: Vec<Frame>,
    ) -> DecodeSummary {
        let results = stream::iter(frames)
            .map(|frame| {
                let decoder = self.clone();
                async move {
                    let frame_index = frame.index();
                    tokio::task::spawn_blocking(move || decoder.decode_frame(&frame)).await.unwrap_or_else(|error| {
                        Err(DecodeError {
                            frame_index,
                            reason: AudioError::Runtime(format!("decode task failed: {error}")),
                        })
                    })
                }
            })
            .buffered(self.parallelism.get())
            .collect::<Vec<_>>()
            .await;

        results.into_iter().fold(DecodeSummary::default(), DecodeSummary::absorb)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message.to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
