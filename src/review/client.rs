#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The scoring client.
//!
//! Sends one chat-completion request per artifact, containing the fixed
//! rubric system prompt plus the artifact's extracted text, and validates
//! the model's JSON response against the rubric schema before returning it.
//! Stateless between calls: the client holds only the transport handle,
//! the model identifier, and the fixed prompt.

use anyhow::{Context, Result, anyhow};
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
};

use crate::{
    config::ConfigHandle,
    rubric::{ArtifactKind, ScoreRecord},
};

/// Issues rubric evaluations against an OpenAI-compatible endpoint.
pub struct ScoringClient {
    /// Transport handle for the OpenAI-compatible API.
    client:         OpenAIClient<OpenAIConfig>,
    /// Model identifier sent with every request.
    model:          String,
    /// Optional sampling temperature.
    temperature:    Option<f32>,
    /// Artifact kind this client scores; selects the rubric and prompt.
    kind:           ArtifactKind,
    /// Fixed rubric system prompt.
    system_message: String,
}

impl ScoringClient {
    /// Builds a scoring client for `kind` from the shared configuration.
    ///
    /// Fails if no API key is configured, since every artifact requires a
    /// remote evaluation.
    pub fn from_config(cfg: &ConfigHandle, kind: ArtifactKind) -> Result<Self> {
        let scoring = cfg
            .scoring()
            .ok_or_else(|| anyhow!("REVIEW_API_KEY must be set to score submissions"))?;

        let client = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_base(scoring.api_base())
                .with_api_key(scoring.api_key()),
        );

        Ok(Self {
            client,
            model: scoring.model().to_string(),
            temperature: scoring.temperature(),
            kind,
            system_message: cfg.prompts().system_message(kind).to_string(),
        })
    }

    /// Returns the artifact kind this client scores.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Scores one artifact's extracted text against the rubric.
    ///
    /// A response that violates the rubric schema is an error; nothing is
    /// retried here.
    pub async fn score(&self, content: &str) -> Result<ScoreRecord> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_message.clone())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(content.to_string())
                .build()?
                .into(),
        ];

        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject);
        if let Some(temperature) = self.temperature {
            request.temperature(temperature);
        }
        let request = request.build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("Scoring request failed")?;

        let payload = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("Scoring response contained no content"))?;

        let record = ScoreRecord::parse(self.kind, &payload)
            .context("Scoring response violated the rubric schema")?;
        Ok(record)
    }
}
