use super::Token;

pub const FRAME_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    tokens: [Token; FRAME_SIZE],
}

impl Frame {
    pub fn new(
        index: usize,
        tokens: [Token; FRAME_SIZE],
    ) -> Self {
        Self {
            index,
            tokens,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tokens(&self) -> &[Token; FRAME_SIZE] {
        &self.tokens
    }
}

/// Number of tokens at the end of a stream that do not fill a whole frame.
pub fn discarded_tail(token_count: usize) -> usize {
    token_count % FRAME_SIZE
}

/// Groups tokens into consecutive, non-overlapping frames. A trailing remainder shorter
/// than a frame is dropped.
pub fn window(tokens: &[Token]) -> Vec<Frame> {
    let chunks = tokens.chunks_exact(FRAME_SIZE);
    let remainder = chunks.remainder().len();
    if remainder > 0 {
        log::debug!("discarding {remainder} trailing audio token(s) that do not fill a frame");
    }

    chunks
        .enumerate()
        .map(|(index, chunk)| {
            let mut frame = [0; FRAME_SIZE];
            frame.copy_from_slice(chunk);
            Frame::new(index, frame)
        })
        .collect()
}
