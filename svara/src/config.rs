use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    audio::{
        AudioError, AudioFormat, AudioTokenSpace, DEFAULT_AUDIO_TOKEN_OFFSET, DEFAULT_CODEBOOK_SIZE,
        DEFAULT_DECODE_PARALLELISM, DEFAULT_SAMPLE_RATE, Token,
    },
    inference::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationParameters},
    prompt::{PromptError, PromptTemplate},
};

pub const DEFAULT_VLLM_URL: &str = "http://localhost:2080";
pub const DEFAULT_VLLM_MODEL: &str = "kenpath/svara-tts-v1";
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "normal";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnvVar {
    VllmUrl,
    VllmModel,
    ApiHost,
    ApiPort,
    RequestTimeoutSecs,
    HealthTimeoutSecs,
    MaxTokens,
    Temperature,
    TopP,
    AudioTokenOffset,
    CodebookSize,
    SampleRate,
    DecodeParallelism,
    CodecModel,
    PromptTemplate,
    CorsOrigins,
    LogLevel,
}

impl EnvVar {
    pub fn key(&self) -> &'static str {
        match self {
            EnvVar::VllmUrl => "VLLM_URL",
            EnvVar::VllmModel => "VLLM_MODEL",
            EnvVar::ApiHost => "API_HOST",
            EnvVar::ApiPort => "API_PORT",
            EnvVar::RequestTimeoutSecs => "SVARA_REQUEST_TIMEOUT_SECS",
            EnvVar::HealthTimeoutSecs => "SVARA_HEALTH_TIMEOUT_SECS",
            EnvVar::MaxTokens => "SVARA_MAX_TOKENS",
            EnvVar::Temperature => "SVARA_TEMPERATURE",
            EnvVar::TopP => "SVARA_TOP_P",
            EnvVar::AudioTokenOffset => "SVARA_AUDIO_TOKEN_OFFSET",
            EnvVar::CodebookSize => "SVARA_CODEBOOK_SIZE",
            EnvVar::SampleRate => "SVARA_SAMPLE_RATE",
            EnvVar::DecodeParallelism => "SVARA_DECODE_PARALLELISM",
            EnvVar::CodecModel => "SVARA_CODEC_MODEL",
            EnvVar::PromptTemplate => "SVARA_PROMPT_TEMPLATE",
            EnvVar::CorsOrigins => "SVARA_CORS_ORIGINS",
            EnvVar::LogLevel => "SVARA_LOG_LEVEL",
        }
    }

    pub fn value(&self) -> Option<String> {
        std::env::var(self.key()).ok().filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid audio configuration: {0}")]
    Audio(#[from] AudioError),
    #[error("unable to read prompt template {path}: {reason}")]
    PromptTemplateFile {
        path: PathBuf,
        reason: String,
    },
    #[error("invalid prompt template: {0}")]
    Prompt(#[from] PromptError),
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub vllm_url: String,
    pub vllm_model: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
    pub generation: GenerationParameters,
    pub token_space: AudioTokenSpace,
    pub format: AudioFormat,
    pub decode_parallelism: usize,
    pub codec_model: Option<PathBuf>,
    pub prompt_template: PromptTemplate,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| variable.value())
    }

    pub fn from_lookup(lookup: impl Fn(EnvVar) -> Option<String>) -> Result<Self, ConfigError> {
        let offset: Token = parse_value(&lookup, EnvVar::AudioTokenOffset)?.unwrap_or(DEFAULT_AUDIO_TOKEN_OFFSET);
        let codebook_size: u32 = parse_value(&lookup, EnvVar::CodebookSize)?.unwrap_or(DEFAULT_CODEBOOK_SIZE);
        let sample_rate: u32 = parse_value(&lookup, EnvVar::SampleRate)?.unwrap_or(DEFAULT_SAMPLE_RATE);

        let generation = GenerationParameters::new(
            parse_value(&lookup, EnvVar::MaxTokens)?.unwrap_or(DEFAULT_MAX_TOKENS),
            parse_value(&lookup, EnvVar::Temperature)?.unwrap_or(DEFAULT_TEMPERATURE),
            parse_value(&lookup, EnvVar::TopP)?.unwrap_or(DEFAULT_TOP_P),
        );

        let prompt_template = match lookup(EnvVar::PromptTemplate) {
            Some(path) => load_prompt_template(Path::new(&path))?,
            None => PromptTemplate::default(),
        };

        let cors_origins = lookup(EnvVar::CorsOrigins)
            .map(|origins| {
                origins.split(',').map(str::trim).filter(|origin| !origin.is_empty()).map(String::from).collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            vllm_url: lookup(EnvVar::VllmUrl).unwrap_or_else(|| DEFAULT_VLLM_URL.to_string()),
            vllm_model: lookup(EnvVar::VllmModel).unwrap_or_else(|| DEFAULT_VLLM_MODEL.to_string()),
            host: lookup(EnvVar::ApiHost).unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            port: parse_value(&lookup, EnvVar::ApiPort)?.unwrap_or(DEFAULT_API_PORT),
            request_timeout: Duration::from_secs(
                parse_value(&lookup, EnvVar::RequestTimeoutSecs)?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            health_timeout: Duration::from_secs(parse_value(&lookup, EnvVar::HealthTimeoutSecs)?.unwrap_or(DEFAULT_HEALTH_TIMEOUT_SECS)),
            generation,
            token_space: AudioTokenSpace::new(offset, codebook_size)?,
            format: AudioFormat::pcm16_mono(sample_rate)?,
            decode_parallelism: parse_value(&lookup, EnvVar::DecodeParallelism)?.unwrap_or(DEFAULT_DECODE_PARALLELISM),
            codec_model: lookup(EnvVar::CodecModel).map(PathBuf::from),
            prompt_template,
            cors_origins,
            log_level: lookup(EnvVar::LogLevel).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vllm_url: DEFAULT_VLLM_URL.to_string(),
            vllm_model: DEFAULT_VLLM_MODEL.to_string(),
            host: DEFAULT_API_HOST.to_string(),
            port: DEFAULT_API_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            generation: GenerationParameters::default(),
            token_space: AudioTokenSpace::default(),
            format: AudioFormat::default(),
            decode_parallelism: DEFAULT_DECODE_PARALLELISM,
            codec_model: None,
            prompt_template: PromptTemplate::default(),
            cors_origins: vec!["*".to_string()],
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn load_prompt_template(path: &Path) -> Result<PromptTemplate, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|error| ConfigError::PromptTemplateFile {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    Ok(PromptTemplate::new(source)?)
}

fn parse_value<T>(
    lookup: &impl Fn(EnvVar) -> Option<String>,
    variable: EnvVar,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(variable) else {
        return Ok(None);
    };

    value.trim().parse::<T>().map(Some).map_err(|error| ConfigError::InvalidValue {
        key: variable.key(),
        value,
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::{ConfigError, EnvVar, ServiceConfig};

    fn lookup_from(pairs: &[(EnvVar, &str)]) -> impl Fn(EnvVar) -> Option<String> {
        let values: HashMap<EnvVar, String> =
            pairs.iter().map(|(variable, value)| (*variable, value.to_string())).collect();
        move |variable| values.get(&variable).cloned()
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let config = ServiceConfig::from_lookup(|_| None).expect("defaults are valid");
        let range = config.token_space.range();

        assert_eq!(config.port, 8000);
        assert_eq!(config.vllm_model, "kenpath/svara-tts-v1");
        assert_eq!((range.min(), range.max()), (128_266, 156_938));
        assert_eq!(config.format.sample_rate(), 24_000);
        assert_eq!(config.generation.max_tokens, 2_048);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(config.codec_model.is_none());
    }

    #[test]
    fn values_override_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (EnvVar::ApiPort, "9000"),
            (EnvVar::RequestTimeoutSecs, "5"),
            (EnvVar::DecodeParallelism, "4"),
            (EnvVar::CorsOrigins, "https://a.example, https://b.example,"),
            (EnvVar::CodecModel, "/models/snac.onnx"),
        ]))
        .expect("valid overrides");

        assert_eq!(config.port, 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.decode_parallelism, 4);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.codec_model.as_deref().and_then(|path| path.to_str()), Some("/models/snac.onnx"));
    }

    #[test]
    fn unparseable_value_names_the_variable() {
        let error = ServiceConfig::from_lookup(lookup_from(&[(EnvVar::ApiPort, "eighty")])).expect_err("not a port");
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                key: "API_PORT",
                ..
            }
        ));
    }

    #[test]
    fn zero_codebook_size_is_rejected() {
        let error =
            ServiceConfig::from_lookup(lookup_from(&[(EnvVar::CodebookSize, "0")])).expect_err("empty codebook");
        assert!(matches!(error, ConfigError::Audio(_)));
    }

    #[test]
    fn prompt_template_is_read_from_file() {
        let path = std::env::temp_dir().join(format!("svara-prompt-{}.jinja", std::process::id()));
        std::fs::write(&path, "Speak as {{ voice }}: {{ text }}").expect("write template");
        let path_value = path.display().to_string();

        let config = ServiceConfig::from_lookup(lookup_from(&[(EnvVar::PromptTemplate, path_value.as_str())]));
        let _ = std::fs::remove_file(&path);

        let prompt = config.expect("valid template").prompt_template.render("hello", "en-US-female").expect("renders");
        assert_eq!(prompt, "Speak as en-US-female: hello");
    }

    #[test]
    fn missing_prompt_template_file_is_rejected() {
        let path = std::env::temp_dir().join("svara-missing-prompt-template.jinja");
        let path_value = path.display().to_string();

        let error = ServiceConfig::from_lookup(lookup_from(&[(EnvVar::PromptTemplate, path_value.as_str())]))
            .expect_err("template file does not exist");
        assert!(matches!(error, ConfigError::PromptTemplateFile { .. }));
    }

    #[test]
    fn default_prompt_template_is_used_without_override() {
        let config = ServiceConfig::from_lookup(|_| None).expect("defaults are valid");
        let prompt = config.prompt_template.render("hello", "en-US-male").expect("renders");
        assert!(prompt.contains("Convert to speech: hello"));
    }
}
