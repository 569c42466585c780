use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::Style;
use svara::{config::ServiceConfig, synthesis::SynthesisRequest};
use tokio::runtime::Runtime;

use crate::server::{build_synthesizer, load_codec, vllm_client};

/// Command-line overrides for the pipeline part of the environment configuration.
#[derive(Debug, Default, Args)]
pub struct SynthesizeArgs {
    /// Base URL of the inference server
    #[arg(long)]
    pub vllm_url: Option<String>,
    /// Model name sent to the inference server
    #[arg(long)]
    pub model: Option<String>,
    /// Path to the codec decoder model
    #[arg(long)]
    pub codec_model: Option<PathBuf>,
    /// Frames decoded concurrently per request
    #[arg(long)]
    pub decode_parallelism: Option<usize>,
}

impl SynthesizeArgs {
    pub fn apply(
        self,
        mut config: ServiceConfig,
    ) -> ServiceConfig {
        if let Some(vllm_url) = self.vllm_url {
            config.vllm_url = vllm_url;
        }
        if let Some(model) = self.model {
            config.vllm_model = model;
        }
        if let Some(codec_model) = self.codec_model {
            config.codec_model = Some(codec_model);
        }
        if let Some(decode_parallelism) = self.decode_parallelism {
            config.decode_parallelism = decode_parallelism;
        }
        config
    }
}

pub fn handle_synthesize(
    request: SynthesisRequest,
    output_path: PathBuf,
    args: SynthesizeArgs,
) -> anyhow::Result<()> {
    let config = args.apply(ServiceConfig::from_env()?);
    let generator = vllm_client(&config)?;
    let codec = load_codec(&config)?;
    let synthesizer = build_synthesizer(&config, generator, codec);

    let runtime = Runtime::new()?;
    let stream = runtime.block_on(synthesizer.synthesize(&request))?;

    std::fs::write(&output_path, stream.bytes())
        .with_context(|| format!("failed to write audio to {}", output_path.display()))?;

    let format = stream.format();
    let style_stats = Style::new().bold();
    println!(
        "{}",
        style_stats.apply_to(format!(
            "{:.2}s of audio, {} frames decoded, {} skipped",
            stream.duration().as_secs_f64(),
            stream.decoded_frames(),
            stream.failed_frames()
        ))
    );
    if stream.failed_frames() > 0 {
        let style_warning = Style::new().yellow();
        println!(
            "{}",
            style_warning.apply_to(format!(
                "⚠️ {} of {} frames failed to decode and were left out of the audio",
                stream.failed_frames(),
                stream.decoded_frames() + stream.failed_frames()
            ))
        );
    }
    if stream.discarded_tokens() > 0 {
        println!("{} trailing audio tokens did not fill a frame and were dropped", stream.discarded_tokens());
    }
    println!(
        "Wrote {} bytes of {}-bit PCM at {} Hz ({} channel) to {}",
        stream.bytes().len(),
        format.bit_depth(),
        format.sample_rate(),
        format.channels(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use svara::config::ServiceConfig;

    use super::SynthesizeArgs;

    #[test]
    fn pipeline_flags_override_environment_values() {
        let args = SynthesizeArgs {
            vllm_url: Some("http://gpu-box:2080".into()),
            model: Some("svara-dev".into()),
            codec_model: Some(PathBuf::from("/models/snac.onnx")),
            decode_parallelism: Some(4),
        };
        let config = args.apply(ServiceConfig::default());

        assert_eq!(config.vllm_url, "http://gpu-box:2080");
        assert_eq!(config.vllm_model, "svara-dev");
        assert_eq!(config.codec_model, Some(PathBuf::from("/models/snac.onnx")));
        assert_eq!(config.decode_parallelism, 4);
        assert_eq!(config.port, 8000);
    }
}
