#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Environment-driven configuration shared across the crate.
//!
//! Everything is loaded once at process start into an immutable
//! [`ConfigState`]; credentials are never embedded in source. `.env` files
//! are honored when the binary loads them via `dotenvy` before first use.

use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::Client;

use crate::rubric::ArtifactKind;

/// Default OpenAI-compatible endpoint used when `REVIEW_API_BASE` is unset.
const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default model identifier used when `REVIEW_MODEL` is unset.
const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Default pause between scoring requests, in milliseconds.
const DEFAULT_REQUEST_DELAY_MS: u64 = 750;

/// Scoring-service credentials and tuning parameters sourced from the
/// environment.
pub struct ScoringEnv {
    /// Base URL of the OpenAI-compatible API endpoint.
    api_base:    String,
    /// API key used to authenticate scoring requests.
    api_key:     String,
    /// Model identifier for chat completions.
    model:       String,
    /// Optional temperature override.
    temperature: Option<f32>,
}

impl ScoringEnv {
    /// Constructs a `ScoringEnv` from environment variables; returns `None`
    /// if no API key is configured.
    fn from_env() -> Option<Self> {
        let api_key = std::env::var("REVIEW_API_KEY").ok()?.trim().to_owned();
        if api_key.is_empty() {
            return None;
        }

        let api_base = std::env::var("REVIEW_API_BASE")
            .map(|s| s.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("REVIEW_MODEL")
            .map(|s| s.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = std::env::var("REVIEW_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f32>().ok());

        Some(Self {
            api_base,
            api_key,
            model,
            temperature,
        })
    }

    /// Returns the API base URL used for scoring requests.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key used for scoring requests.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the configured temperature, if any.
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// Rubric system prompts embedded in the binary.
pub struct PromptCatalog {
    /// System prompt for the code-review rubric.
    code_system_message:         String,
    /// System prompt for the presentation-review rubric.
    presentation_system_message: String,
}

impl PromptCatalog {
    /// Loads the prompt templates embedded in the binary.
    pub fn load() -> Self {
        Self {
            code_system_message:         include_str!("prompts/code_system_message.md").to_string(),
            presentation_system_message: include_str!("prompts/presentation_system_message.md")
                .to_string(),
        }
    }

    /// Returns the system prompt for the given artifact kind.
    pub fn system_message(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::CodeChunk => &self.code_system_message,
            ArtifactKind::Presentation => &self.presentation_system_message,
        }
    }
}

/// Runtime and prompt configuration shared across the crate.
pub struct ConfigState {
    /// Scoring-service credentials, if configured.
    scoring:       Option<ScoringEnv>,
    /// Shared reqwest HTTP client reused across network helpers.
    http_client:   Client,
    /// Rubric prompt bundle.
    prompts:       PromptCatalog,
    /// Pause inserted after each scoring request as rate-limit
    /// back-pressure.
    request_delay: Duration,
}

impl ConfigState {
    /// Constructs a new configuration instance from the environment and
    /// embedded prompt assets.
    fn new() -> Result<Self> {
        let http_client = Client::builder()
            // Avoid macOS dynamic store lookups that fail in sandboxed environments.
            .no_proxy()
            .build()
            .context("Failed to construct shared HTTP client")?;

        let request_delay = std::env::var("REVIEW_REQUEST_DELAY_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(DEFAULT_REQUEST_DELAY_MS));

        Ok(Self {
            scoring: ScoringEnv::from_env(),
            http_client,
            prompts: PromptCatalog::load(),
            request_delay,
        })
    }

    /// Returns the scoring-service configuration, if an API key is present.
    pub fn scoring(&self) -> Option<&ScoringEnv> {
        self.scoring.as_ref()
    }

    /// Returns a clone of the shared reqwest HTTP client.
    pub fn http_client(&self) -> Client {
        self.http_client.clone()
    }

    /// Returns the rubric prompt bundle.
    pub fn prompts(&self) -> &PromptCatalog {
        &self.prompts
    }

    /// Returns the pause inserted between scoring requests.
    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensures the global configuration has been initialized and returns a
/// handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot.lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = ConfigState::new().map(Arc::new)?;
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> ConfigHandle {
    ensure_initialized().expect("configuration initialization failed")
}

/// Returns a clone of the shared reqwest HTTP client.
pub fn http_client() -> Client {
    get().http_client()
}

/// Returns the pause inserted between scoring requests.
pub fn request_delay() -> Duration {
    get().request_delay()
}
