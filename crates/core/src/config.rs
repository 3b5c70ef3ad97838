//! Credential Configuration
//!
//! Explicit configuration for the collaborators that need credentials: the
//! hosted model that generates quizzes and the OCR service that turns PDFs into
//! text. Both are built through validating builders (or from environment
//! variables) so that a missing key fails at startup, not at the first request.
//!
//! ## Builders
//!
//! 1. Create with `::new()` or `::default()`
//! 2. Chain `.field(value)` calls
//! 3. Call `.build()` which validates and returns `CoreResult<Config>`
//!
//! Reading the environment never writes back to it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Primary environment variable for the generator key.
pub const GENERATOR_KEY_VAR: &str = "GROQ_API_KEY";
/// Legacy name still accepted when the primary one is absent.
pub const GENERATOR_KEY_FALLBACK_VAR: &str = "GROQ_KEY";
/// Environment variable for the OCR key.
pub const OCR_KEY_VAR: &str = "UPSTAGE_API_KEY";

pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.upstage.ai/v1/document-ai/ocr";

// ============================================================================
// ApiKey
// ============================================================================

/// An API key whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting empty or whitespace-only values.
    pub fn new(key: impl Into<String>) -> CoreResult<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("api key cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn validate_url(field: &str, url: &str) -> CoreResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "{} must start with http:// or https://. Got: '{}'",
            field, url
        )))
    }
}

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Sampling parameters forwarded to the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.5,
            top_p: 1.0,
        }
    }
}

/// Validated configuration for the quiz-generating model.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: ApiKey,
    pub api_base_url: String,
    pub model: String,
    pub params: GenerationParams,
}

impl GeneratorConfig {
    /// Build from the process environment.
    ///
    /// Reads `GROQ_API_KEY`, falling back to `GROQ_KEY`.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(GENERATOR_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(GENERATOR_KEY_FALLBACK_VAR))
            .ok_or_else(|| {
                CoreError::config(format!(
                    "{} (or {}) is not set",
                    GENERATOR_KEY_VAR, GENERATOR_KEY_FALLBACK_VAR
                ))
            })?;

        let config = GeneratorConfigBuilder::new().api_key(key).build()?;
        tracing::debug!(
            model = %config.model,
            base_url = %config.api_base_url,
            "generator config loaded"
        );
        Ok(config)
    }

    /// Sampling parameters as a JSON object.
    pub fn generation_kwargs(&self) -> serde_json::Value {
        serde_json::to_value(self.params).unwrap_or(serde_json::Value::Null)
    }
}

/// Builder for generator configuration.
///
/// `api_key` is required.
///
/// # Example
/// ```ignore
/// let config = GeneratorConfigBuilder::new()
///     .api_key("gsk_...")
///     .temperature(0.2)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    api_key: Option<String>,
    api_base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    top_p: Option<f32>,
}

impl GeneratorConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the OpenAI-compatible base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the completion token limit.
    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Set nucleus sampling.
    pub fn top_p(mut self, p: f32) -> Self {
        self.top_p = Some(p);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> CoreResult<GeneratorConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| CoreError::validation("api_key is required"))
            .and_then(ApiKey::new)?;

        let api_base_url = self
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_url("api_base_url", &api_base_url)?;

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(CoreError::validation("model cannot be empty"));
        }

        let defaults = GenerationParams::default();
        let params = GenerationParams {
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
        };

        if params.max_tokens == 0 {
            return Err(CoreError::validation("max_tokens must be > 0"));
        }
        if !(0.0..=2.0).contains(&params.temperature) {
            return Err(CoreError::validation(
                "temperature must be between 0.0 and 2.0",
            ));
        }
        if !(params.top_p > 0.0 && params.top_p <= 1.0) {
            return Err(CoreError::validation("top_p must be in (0.0, 1.0]"));
        }

        Ok(GeneratorConfig {
            api_key,
            api_base_url,
            model,
            params,
        })
    }
}

// ============================================================================
// OcrConfig
// ============================================================================

/// Validated configuration for the document OCR service.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub api_key: ApiKey,
    pub endpoint: String,
}

impl OcrConfig {
    /// Build from the process environment (`UPSTAGE_API_KEY`).
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(OCR_KEY_VAR)
            .ok_or_else(|| CoreError::config(format!("{} is not set", OCR_KEY_VAR)))?;
        OcrConfigBuilder::new().api_key(key).build()
    }
}

/// Builder for OCR configuration. `api_key` is required.
#[derive(Debug, Default)]
pub struct OcrConfigBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
}

impl OcrConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn build(self) -> CoreResult<OcrConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| CoreError::validation("api_key is required"))
            .and_then(ApiKey::new)?;
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_OCR_ENDPOINT.to_string());
        validate_url("endpoint", &endpoint)?;

        Ok(OcrConfig { api_key, endpoint })
    }
}
