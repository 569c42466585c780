use std::sync::Arc;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use svara::{
    audio::{self, CodecInitError, FrameCodec, FrameDecoder},
    config::ServiceConfig,
    inference::{InferenceError, TokenGenerator, VllmClient},
    synthesis::Synthesizer,
    voice::VoiceCatalog,
};

/// Everything a request handler needs. The codec is optional: when it failed to load the
/// server still answers health checks but refuses synthesis.
pub struct ServiceState {
    pub config: ServiceConfig,
    pub generator: Arc<dyn TokenGenerator>,
    pub synthesizer: Option<Synthesizer>,
    pub voices: VoiceCatalog,
}

impl ServiceState {
    pub fn new(
        config: ServiceConfig,
        generator: Arc<dyn TokenGenerator>,
        codec: Option<Arc<dyn FrameCodec>>,
    ) -> Self {
        let synthesizer = codec.map(|codec| build_synthesizer(&config, generator.clone(), codec));

        Self {
            config,
            generator,
            synthesizer,
            voices: VoiceCatalog::default(),
        }
    }

    pub fn from_config(config: ServiceConfig) -> Result<Self, InferenceError> {
        let generator = vllm_client(&config)?;
        let codec = load_codec(&config).ok();
        Ok(Self::new(config, generator, codec))
    }

    pub fn codec_loaded(&self) -> bool {
        self.synthesizer.is_some()
    }
}

pub fn vllm_client(config: &ServiceConfig) -> Result<Arc<dyn TokenGenerator>, InferenceError> {
    let client =
        VllmClient::new(&config.vllm_url, &config.vllm_model, config.request_timeout, config.health_timeout)?;
    Ok(Arc::new(client))
}

pub fn build_synthesizer(
    config: &ServiceConfig,
    generator: Arc<dyn TokenGenerator>,
    codec: Arc<dyn FrameCodec>,
) -> Synthesizer {
    let decoder = FrameDecoder::new(codec, config.decode_parallelism);
    Synthesizer::new(generator, decoder, config.token_space.range(), config.request_timeout)
        .generation(config.generation)
        .prompt_template(config.prompt_template.clone())
}

pub fn load_codec(config: &ServiceConfig) -> Result<Arc<dyn FrameCodec>, CodecInitError> {
    let style_bold = Style::new().bold();
    let codec_name = style_bold
        .apply_to(
            config
                .codec_model
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<not configured>".to_string()),
        )
        .to_string();

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.enable_steady_tick(std::time::Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} Loading codec: {msg}") {
        progress_bar.set_style(style);
    }
    progress_bar.set_message(codec_name.clone());

    let codec = audio::load_codec(config.codec_model.as_deref(), config.token_space, config.format);

    match &codec {
        Ok(_) => {
            if let Ok(style) = ProgressStyle::default_spinner().template("Loaded codec: {msg}") {
                progress_bar.set_style(style);
            }
            progress_bar.finish_with_message(codec_name);
        },
        Err(error) => {
            progress_bar.finish_and_clear();
            eprintln!("❌ Failed to load codec: {error}");
        },
    }

    codec
}
