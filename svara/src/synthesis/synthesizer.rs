use std::{sync::Arc, time::Duration};

use super::{SynthesisError, SynthesisRequest};
use crate::{
    audio::{AudioStream, AudioTokenRange, FrameDecoder, discarded_tail, window},
    inference::{GenerationParameters, InferenceError, TokenGenerator},
    prompt::PromptTemplate,
};

/// Runs the text → tokens → frames → audio pipeline for one request at a time. Holds no
/// per-request state, so one instance is shared by all handlers.
#[derive(Clone)]
pub struct Synthesizer {
    generator: Arc<dyn TokenGenerator>,
    decoder: FrameDecoder,
    token_range: AudioTokenRange,
    prompt_template: PromptTemplate,
    generation: GenerationParameters,
    inference_timeout: Duration,
}

impl Synthesizer {
    pub fn new(
        generator: Arc<dyn TokenGenerator>,
        decoder: FrameDecoder,
        token_range: AudioTokenRange,
        inference_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            decoder,
            token_range,
            prompt_template: PromptTemplate::default(),
            generation: GenerationParameters::default(),
            inference_timeout,
        }
    }

    pub fn prompt_template(
        mut self,
        prompt_template: PromptTemplate,
    ) -> Self {
        self.prompt_template = prompt_template;
        self
    }

    pub fn generation(
        mut self,
        generation: GenerationParameters,
    ) -> Self {
        self.generation = generation;
        self
    }

    pub fn token_range(&self) -> AudioTokenRange {
        self.token_range
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<AudioStream, SynthesisError> {
        request.validate()?;
        let prompt = self.prompt_template.render(&request.text, &request.voice)?;

        let tokens = self.generate_tokens(&prompt).await?;
        let audio_tokens = self.token_range.classify(&tokens);
        log::debug!("{} of {} generated tokens are audio tokens", audio_tokens.len(), tokens.len());
        if audio_tokens.is_empty() {
            return Err(SynthesisError::NoAudioContent);
        }

        let discarded_tokens = discarded_tail(audio_tokens.len());
        let frames = window(&audio_tokens);
        let frame_count = frames.len();

        let (chunks, failures) = self.decoder.decode_frames(frames).await.into_parts();
        if !failures.is_empty() {
            log::warn!("{} of {} frames failed to decode and were skipped", failures.len(), frame_count);
        }

        let stream = AudioStream::assemble(self.decoder.format(), chunks, failures.len(), discarded_tokens);
        log::info!(
            "synthesized {:.2}s of audio from {} frames (voice {}, speed {})",
            stream.duration().as_secs_f64(),
            stream.decoded_frames(),
            request.voice,
            request.speed,
        );
        Ok(stream)
    }

    async fn generate_tokens(
        &self,
        prompt: &str,
    ) -> Result<Vec<u64>, SynthesisError> {
        let timeout_ms = self.inference_timeout.as_millis() as u64;
        let generated = tokio::time::timeout(self.inference_timeout, self.generator.generate(prompt, &self.generation))
            .await
            .map_err(|_| SynthesisError::Timeout {
                timeout_ms,
            })?;

        generated.map_err(|error| match error {
            InferenceError::Timeout {
                timeout_ms,
            } => SynthesisError::Timeout {
                timeout_ms,
            },
            other => SynthesisError::Inference(other),
        })
    }
}
