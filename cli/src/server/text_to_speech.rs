use std::{io::Cursor, time::Instant};

use rocket::{
    Request, Response, State,
    http::ContentType,
    post,
    response::{self, Responder},
    serde::json::Json,
};
use svara::{
    audio::AudioStream,
    synthesis::{SynthesisError, SynthesisRequest},
};
use uuid::Uuid;

use crate::server::{ApiError, ServiceState};

/// Raw PCM body with the format advertised in headers.
pub struct PcmAudio(pub AudioStream);

impl<'r> Responder<'r, 'static> for PcmAudio {
    fn respond_to(
        self,
        _request: &'r Request<'_>,
    ) -> response::Result<'static> {
        let format = self.0.format();
        let decoded_frames = self.0.decoded_frames();
        let failed_frames = self.0.failed_frames();
        let bytes = self.0.into_bytes();

        Response::build()
            .header(ContentType::new("audio", "pcm"))
            .raw_header("X-Sample-Rate", format.sample_rate().to_string())
            .raw_header("X-Bit-Depth", format.bit_depth().to_string())
            .raw_header("X-Channels", format.channels().to_string())
            .raw_header("X-Decoded-Frames", decoded_frames.to_string())
            .raw_header("X-Failed-Frames", failed_frames.to_string())
            .sized_body(bytes.len(), Cursor::new(bytes))
            .ok()
    }
}

#[post("/v1/text-to-speech", data = "<request>")]
pub async fn handle_text_to_speech(
    request: Json<SynthesisRequest>,
    state: &State<ServiceState>,
) -> Result<PcmAudio, ApiError> {
    let id = Uuid::new_v4();
    log::info!(
        "[{id}] text-to-speech request: {} chars, voice {}, speed {}",
        request.text.chars().count(),
        request.voice,
        request.speed
    );

    if state.voices.get(&request.voice).is_none() {
        log::warn!("[{id}] voice {} is not in the catalog, passing it to the model as is", request.voice);
    }

    let Some(synthesizer) = state.synthesizer.as_ref() else {
        log::error!("[{id}] rejected: codec not initialized");
        return Err(SynthesisError::CodecNotInitialized.into());
    };

    let start_time = Instant::now();
    match synthesizer.synthesize(&request).await {
        Ok(stream) => {
            log::info!(
                "[{id}] sending {} bytes ({} frames decoded, {} skipped) in {:.3}s",
                stream.bytes().len(),
                stream.decoded_frames(),
                stream.failed_frames(),
                start_time.elapsed().as_secs_f64()
            );
            Ok(PcmAudio(stream))
        },
        Err(error) => {
            log::error!("[{id}] synthesis failed ({}): {error}", error.kind());
            Err(error.into())
        },
    }
}
