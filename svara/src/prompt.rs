use minijinja::{Environment, context};

pub const DEFAULT_PROMPT_TEMPLATE: &str = "<|im_start|>system\nYou are a text-to-speech system.<|im_end|>\n\
<|im_start|>user\nConvert to speech: {{ text }}<|im_end|>\n\
<|im_start|>assistant\n";

const TEMPLATE_NAME: &str = "tts_prompt";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unable to load prompt template: {0}")]
    UnableToLoadTemplate(String),
    #[error("Unable to render prompt template: {0}")]
    UnableToRenderTemplate(String),
}

/// Chat-format prompt sent to the speech language model. The template sees `text` and
/// `voice`.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self, PromptError> {
        let template = Self {
            source: source.into(),
        };
        template.environment()?;
        Ok(template)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn environment(&self) -> Result<Environment<'_>, PromptError> {
        let mut environment = Environment::new();
        environment.set_keep_trailing_newline(true);
        environment
            .add_template(TEMPLATE_NAME, self.source.as_str())
            .map_err(|error| PromptError::UnableToLoadTemplate(error.to_string()))?;
        Ok(environment)
    }

    pub fn render(
        &self,
        text: &str,
        voice: &str,
    ) -> Result<String, PromptError> {
        let environment = self.environment()?;
        let template = environment
            .get_template(TEMPLATE_NAME)
            .map_err(|error| PromptError::UnableToLoadTemplate(error.to_string()))?;

        template
            .render(context!(
                text => text,
                voice => voice,
            ))
            .map_err(|error| PromptError::UnableToRenderTemplate(error.to_string()))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}
