use std::{path::Path, sync::Mutex};

use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::Tensor,
};

use super::{AudioChunk, AudioError, AudioFormat, AudioResult, AudioTokenSpace, CodecInitError, Frame, FrameCodec, SnacCodes};

pub const SNAC_SAMPLES_PER_FRAME: usize = 2_048;

const CODE_INPUT_NAMES: [&str; 3] = ["audio_codes.0", "audio_codes.1", "audio_codes.2"];

/// SNAC decoder exported to ONNX. The session is not reentrant, so decode calls are
/// serialized through a mutex.
pub struct SnacOnnxCodec {
    session: Mutex<Session>,
    token_space: AudioTokenSpace,
    format: AudioFormat,
    samples_per_frame: usize,
}

impl SnacOnnxCodec {
    pub fn load(
        model_path: &Path,
        token_space: AudioTokenSpace,
        format: AudioFormat,
    ) -> Result<Self, CodecInitError> {
        if !model_path.exists() {
            return Err(CodecInitError::ModelNotFound(model_path.to_path_buf()));
        }

        let _ = ort::init().commit();

        let session = Session::builder()
            .map_err(|error| CodecInitError::Runtime(format!("failed to create session builder: {error}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|error| CodecInitError::Runtime(format!("failed to set optimization level: {error}")))?
            .commit_from_file(model_path)
            .map_err(|error| CodecInitError::Runtime(format!("failed to load SNAC decoder: {error}")))?;

        log::info!("loaded SNAC decoder from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
            token_space,
            format,
            samples_per_frame: SNAC_SAMPLES_PER_FRAME,
        })
    }

    pub fn samples_per_frame(&self) -> usize {
        self.samples_per_frame
    }

    fn run_decoder(
        &self,
        codes: &SnacCodes,
    ) -> AudioResult<Vec<f32>> {
        let mut tensors = Vec::with_capacity(CODE_INPUT_NAMES.len());
        for level in codes.levels() {
            let values = level.iter().map(|&code| code as i64).collect::<Vec<_>>();
            let tensor = Tensor::from_array(([1usize, values.len()], values))
                .map_err(|error| AudioError::Runtime(format!("failed to create code tensor: {error}")))?;
            tensors.push(tensor);
        }
        let [coarse, middle, fine]: [Tensor<i64>; 3] = tensors
            .try_into()
            .map_err(|_| AudioError::Runtime("SNAC codes must have exactly three levels".into()))?;

        let mut session = self.session.lock().map_err(|_| AudioError::Runtime("SNAC session mutex poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![
                CODE_INPUT_NAMES[0] => coarse,
                CODE_INPUT_NAMES[1] => middle,
                CODE_INPUT_NAMES[2] => fine,
            ])
            .map_err(|error| AudioError::Runtime(format!("SNAC inference failed: {error}")))?;

        let (_, samples) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|error| AudioError::Runtime(format!("failed to extract SNAC output: {error}")))?;

        Ok(samples.to_vec())
    }
}

impl FrameCodec for SnacOnnxCodec {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn decode_frame(
        &self,
        frame: &Frame,
    ) -> AudioResult<AudioChunk> {
        let codes = SnacCodes::from_frame(frame, &self.token_space)?;
        let samples = self.run_decoder(&codes)?;

        let block = samples.get(..self.samples_per_frame).ok_or(AudioError::InvalidPcmBlock {
            expected_bytes: self.samples_per_frame * self.format.bytes_per_sample(),
            actual_bytes: samples.len() * self.format.bytes_per_sample(),
        })?;

        Ok(AudioChunk::from_f32_samples(frame.index(), block))
    }
}
