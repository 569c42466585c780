use std::num::NonZeroU32;

use super::{AudioError, AudioResult, FRAME_SIZE, Token};

pub const DEFAULT_AUDIO_TOKEN_OFFSET: Token = 128_266;
pub const DEFAULT_CODEBOOK_SIZE: u32 = 4_096;

/// Inclusive bounds of the audio-bearing part of the model vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTokenRange {
    min: Token,
    max: Token,
}

impl AudioTokenRange {
    pub fn new(
        min: Token,
        max: Token,
    ) -> AudioResult<Self> {
        if min > max {
            return Err(AudioError::InvalidTokenRange {
                min,
                max,
            });
        }

        Ok(Self {
            min,
            max,
        })
    }

    pub fn min(&self) -> Token {
        self.min
    }

    pub fn max(&self) -> Token {
        self.max
    }

    pub fn contains(
        &self,
        token: Token,
    ) -> bool {
        (self.min..=self.max).contains(&token)
    }

    pub fn classify(
        &self,
        tokens: &[Token],
    ) -> Vec<Token> {
        tokens.iter().copied().filter(|&token| self.contains(token)).collect()
    }
}

/// Codec vocabulary as laid out inside the language model vocabulary: every frame
/// position owns its own block of `cardinality` ids, starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTokenSpace {
    offset: Token,
    cardinality: NonZeroU32,
}

impl AudioTokenSpace {
    pub fn new(
        offset: Token,
        cardinality: u32,
    ) -> AudioResult<Self> {
        let cardinality = NonZeroU32::new(cardinality).ok_or(AudioError::InvalidTokenCardinality)?;

        Ok(Self {
            offset,
            cardinality,
        })
    }

    pub fn offset(&self) -> Token {
        self.offset
    }

    pub fn cardinality(&self) -> u32 {
        self.cardinality.get()
    }

    pub fn position_offset(
        &self,
        position: usize,
    ) -> Token {
        self.offset + position as Token * self.cardinality.get() as Token
    }

    /// The last position's offset plus one full codebook, inclusive.
    pub fn range(&self) -> AudioTokenRange {
        let max = self.position_offset(FRAME_SIZE - 1) + self.cardinality.get() as Token;
        AudioTokenRange {
            min: self.offset,
            max,
        }
    }

    pub fn map_model_to_codec(
        &self,
        position: usize,
        model_token: Token,
    ) -> AudioResult<u32> {
        let start = self.position_offset(position);
        let end = start + self.cardinality.get() as Token - 1;

        if model_token < start || model_token > end {
            return Err(AudioError::InvalidModelToken {
                token: model_token,
                position,
                range_start: start,
                range_end: end,
            });
        }

        Ok((model_token - start) as u32)
    }
}

impl Default for AudioTokenSpace {
    fn default() -> Self {
        Self {
            offset: DEFAULT_AUDIO_TOKEN_OFFSET,
            cardinality: const { NonZeroU32::new(DEFAULT_CODEBOOK_SIZE).unwrap() },
        }
    }
}
