//! AI enhancement facade: content improvement, ATS match analysis, and chat replies.
//!
//! The facade validates and bounds its inputs, calls the configured [`TextGenerator`],
//! and bounds the output. It never touches the document; improvements come back as
//! [`Suggestion`]s that the session applies only on explicit accept.

pub mod canned;
pub mod handlers;
pub mod match_scoring;
pub mod prompts;
pub mod suggestion;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::export::Notification;
use crate::llm_client::{LlmError, TextGenerator};

pub use match_scoring::score_match;
pub use suggestion::{accept, AcceptOutcome, StaleReason, Suggestion, SuggestionTarget};

/// Rough characters-per-token ratio used to bound replies.
const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("AI request failed: {0}")]
    AIRequestFailed(#[from] LlmError),

    #[error("Input is empty")]
    EmptyInput,

    #[error("Input is {len} characters, limit is {max}")]
    InputTooLong { len: usize, max: usize },
}

/// Which assistant call failed, for the failure toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantCall {
    Improve,
    AnalyzeMatch,
    Chat,
}

impl AssistantError {
    pub fn notification(&self, call: AssistantCall) -> Notification {
        let description = match call {
            AssistantCall::Improve => "Failed to improve content. Please try again.",
            AssistantCall::AnalyzeMatch => "Failed to analyze ATS compatibility. Please try again.",
            AssistantCall::Chat => "Failed to get AI response. Please try again.",
        };
        Notification::failure("Error", description)
    }

    /// Chat-style message shown in place of the reply.
    pub fn apology(&self, call: AssistantCall) -> &'static str {
        match call {
            AssistantCall::Improve => "Sorry, I couldn't improve this content. Please try again.",
            AssistantCall::AnalyzeMatch => {
                "Sorry, I couldn't analyze the compatibility. Please try again."
            }
            AssistantCall::Chat => "I'm sorry, I couldn't process your request. Please try again.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AiLimits {
    pub max_input_chars: usize,
    pub max_output_tokens: u32,
}

impl Default for AiLimits {
    fn default() -> Self {
        Self {
            max_input_chars: 8000,
            max_output_tokens: 500,
        }
    }
}

/// Full ATS report: local keyword score plus the backend's narrative.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub score: u32,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendation: String,
    pub narrative: String,
    pub backend: &'static str,
}

impl MatchReport {
    pub fn notification() -> Notification {
        Notification::success(
            "ATS Analysis Complete",
            "Your resume has been analyzed for ATS compatibility.",
        )
    }
}

#[derive(Clone)]
pub struct AiAssistant {
    generator: Arc<dyn TextGenerator>,
    limits: AiLimits,
}

impl AiAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>, limits: AiLimits) -> Self {
        Self { generator, limits }
    }

    pub fn backend(&self) -> &'static str {
        self.generator.backend()
    }

    /// Suggests a rewrite of `text`. The suggestion is not applied anywhere.
    pub async fn improve(
        &self,
        target: SuggestionTarget,
        text: &str,
    ) -> Result<Suggestion, AssistantError> {
        self.check_input(text)?;
        let prompt = prompts::improve_prompt(target.label(), text);
        let reply = self.generate(&prompt).await?;
        info!(section = target.label(), backend = self.backend(), "Improvement generated");
        Ok(Suggestion::new(target, text.to_string(), reply))
    }

    pub async fn analyze_match(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<MatchReport, AssistantError> {
        self.check_input(job_description)?;
        self.check_input(resume_text)?;

        let local = score_match(job_description, resume_text);
        let prompt = prompts::ats_prompt(job_description, resume_text);
        let narrative = self.generate(&prompt).await?;
        info!(score = local.score, missing = local.missing.len(), "ATS analysis complete");

        Ok(MatchReport {
            score: local.score,
            strengths: local.strengths(),
            missing_keywords: local.missing,
            recommendation: local.recommendation,
            narrative,
            backend: self.backend(),
        })
    }

    pub async fn chat(&self, message: &str) -> Result<String, AssistantError> {
        self.check_input(message)?;
        self.generate(&prompts::chat_prompt(message)).await
    }

    fn check_input(&self, text: &str) -> Result<(), AssistantError> {
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyInput);
        }
        let len = text.chars().count();
        if len > self.limits.max_input_chars {
            return Err(AssistantError::InputTooLong {
                len,
                max: self.limits.max_input_chars,
            });
        }
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let reply = self
            .generator
            .generate(prompt, prompts::SYSTEM_PROMPT, self.limits.max_output_tokens)
            .await
            .map_err(|e| {
                warn!(backend = self.backend(), error = %e, "AI request failed");
                AssistantError::AIRequestFailed(e)
            })?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AssistantError::AIRequestFailed(LlmError::EmptyContent));
        }
        let max_chars = self.limits.max_output_tokens as usize * CHARS_PER_TOKEN;
        Ok(reply.chars().take(max_chars).collect())
    }
}
