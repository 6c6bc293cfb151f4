//! Card generation service.
//!
//! Builds the prompt, calls the text model once, and turns the reply into a
//! validated [`BookCard`]. Every failure along the way surfaces as a single
//! [`GenerationError`].

pub use crate::card::BookCard;

use crate::card::CardError;
use crate::config::{Config, ConfigError};
use crate::gemini::{GeminiClient, ModelError, TextModel};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").unwrap();
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("could not reach the model: {0}")]
    Transport(String),
    #[error("the API key was rejected by the model provider")]
    Unauthorized,
    #[error("the model provider is rate limiting requests, try again shortly")]
    RateLimited,
    #[error("the model could not produce a card: {0}")]
    Upstream(String),
    #[error("the model did not return valid JSON: {0}")]
    MalformedJson(String),
    #[error("incomplete response: {0}")]
    Incomplete(#[from] CardError),
}

impl From<ModelError> for GenerationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Transport(e) => GenerationError::Transport(e.to_string()),
            ModelError::Unauthorized => GenerationError::Unauthorized,
            ModelError::RateLimited => GenerationError::RateLimited,
            other => GenerationError::Upstream(other.to_string()),
        }
    }
}

/// Turns book titles into book cards using a [`TextModel`].
pub struct CardService<M> {
    model: M,
    language: String,
}

impl CardService<GeminiClient> {
    /// Build the Gemini-backed service; fails when the API key is absent.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let client = GeminiClient::new(
            api_key,
            &config.api.base_url,
            &config.agent.model,
            config.agent.temperature,
        )
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::new(client, &config.agent.language))
    }
}

impl<M: TextModel> CardService<M> {
    pub fn new(model: M, language: &str) -> Self {
        Self {
            model,
            language: language.to_string(),
        }
    }

    /// Generate a card for `title`. The caller is expected to pass a non-blank title.
    pub async fn generate_card(&self, title: &str) -> Result<BookCard, GenerationError> {
        tracing::info!(%title, "generating book card");
        let result = self.try_generate(title).await;
        match &result {
            Ok(card) => tracing::info!(
                title = %card.title,
                pages = card.detailed_analysis.len(),
                "book card ready"
            ),
            Err(e) => tracing::warn!(%title, error = %e, "book card generation failed"),
        }
        result
    }

    async fn try_generate(&self, title: &str) -> Result<BookCard, GenerationError> {
        let prompt = build_prompt(title, &self.language);
        let text = self.model.generate(&prompt).await?;
        parse_card(&text)
    }
}

/// Parse a raw model reply into a validated card
pub fn parse_card(text: &str) -> Result<BookCard, GenerationError> {
    let payload = strip_code_fence(text);
    let value: Value = serde_json::from_str(payload).map_err(|e| {
        tracing::debug!(payload, "unparseable model reply");
        GenerationError::MalformedJson(e.to_string())
    })?;
    Ok(BookCard::from_value(value)?)
}

/// Strip a ```` ```json ... ``` ```` wrapper if the reply has one
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(2)) {
        Some(body) if !body.as_str().is_empty() => body.as_str().trim(),
        _ => trimmed,
    }
}

/// Build the instruction sent to the model for `title`
pub fn build_prompt(title: &str, language: &str) -> String {
    let schema = schemars::schema_for!(BookCard);

    format!(
        r#"Analyse the book titled "{title}".
Based on your analysis, produce a JSON object with the following structure:
{{
  "title": "the full title of the book in {language}",
  "author": "the author's name in {language}",
  "summary": "a concise, engaging summary of the book in {language}, about 50-70 words",
  "takeaways": [
    "a key idea or lesson from the book in {language}",
    "another important lesson or concept in {language}",
    "a third important point in {language}"
  ],
  "quote": "an inspiring or thought-provoking quote from the book in {language}",
  "detailedAnalysis": [
    "an in-depth analysis of the book's main themes in {language} (about 80-100 words)",
    "how the main characters develop and shape the story in {language} (about 80-100 words)",
    "how the main plot resolves and the impact of the ending in {language} (about 80-100 words)"
  ],
  "themeColor": "a single hex colour code (such as '#4A90E2') representing the mood, theme or cover of the book"
}}

The object must validate against this JSON schema:
{schema:#}

Make sure every text value is written entirely in {language}.
Make sure detailedAnalysis is an array of exactly three entries.
Respond with the JSON object only, well formed and following the structure exactly."#,
        schema = schema.as_value(),
    )
}
