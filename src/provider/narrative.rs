//! LLM-backed narrative analysis.
//!
//! All brittle extraction of structured output from model text lives
//! here, behind [`extract_fenced_json`]. Callers receive a typed result
//! or a [`ProviderError`]; enrichment paths convert any error into the
//! fixed defaults ([`MatchAnalysis::unavailable`],
//! [`FreedomAnalysis::manual_review`]).

use std::time::Duration;

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::NarrativeProvider;
use super::error::ProviderError;
use crate::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;

const PROVIDER_NAME: &str = "narrative";

const ANALYSIS_TEMPERATURE: f64 = 0.3;
const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// One claim as presented to the narrative provider.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRef {
    pub number: u32,
    pub is_independent: bool,
    pub text: String,
}

impl ClaimRef {
    fn role(&self) -> &'static str {
        if self.is_independent {
            "Independent"
        } else {
            "Dependent"
        }
    }
}

/// A matched claim pair queued for narrative assessment.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPairContext {
    pub similarity: f32,
    pub source: ClaimRef,
    pub target: ClaimRef,
}

/// One blocking-document group queued for freedom-to-operate assessment.
#[derive(Debug, Clone, Serialize)]
pub struct GroupContext {
    pub patent_number: Option<String>,
    pub title: String,
    pub max_similarity: f32,
    pub top_claim_number: u32,
    pub top_claim_text: String,
}

/// Invention description plus its top blocking groups.
#[derive(Debug, Clone, Serialize)]
pub struct PriorArtContext {
    pub invention: String,
    pub groups: Vec<GroupContext>,
}

/// Narrative assessment of a claim-level comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub match_assessments: Vec<String>,
}

impl MatchAnalysis {
    /// Fixed degradation result when the provider fails or returns
    /// output that cannot be interpreted.
    pub fn unavailable() -> Self {
        Self {
            summary: "Narrative analysis unavailable.".to_string(),
            recommendation: "Manual review recommended.".to_string(),
            match_assessments: Vec::new(),
        }
    }
}

/// Narrative freedom-to-operate assessment for prior-art search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreedomAnalysis {
    #[serde(default)]
    pub freedom_to_operate: String,
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub design_around_suggestions: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

impl FreedomAnalysis {
    /// Fixed degradation result when the provider fails or returns
    /// output that cannot be interpreted.
    pub fn manual_review() -> Self {
        Self {
            freedom_to_operate: "uncertain".to_string(),
            key_risks: vec!["Analysis unavailable - manual review recommended".to_string()],
            design_around_suggestions: Vec::new(),
            recommendation: "Manual review recommended.".to_string(),
        }
    }
}

/// Configuration for [`LlmNarrativeProvider`].
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Chat model identifier, e.g. `openai/gpt-4o-mini`.
    pub model: String,
    /// Per-call time bound.
    pub timeout: Duration,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

/// Narrative provider backed by a genai chat client.
pub struct LlmNarrativeProvider {
    client: Client,
    config: NarrativeConfig,
}

impl std::fmt::Debug for LlmNarrativeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmNarrativeProvider")
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl LlmNarrativeProvider {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            client: Client::default(),
            config,
        }
    }

    async fn exec_prompt(&self, prompt: String) -> Result<String, ProviderError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = ChatOptions::default()
            .with_temperature(ANALYSIS_TEMPERATURE)
            .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let call = self
            .client
            .exec_chat(&self.config.model, request, Some(&options));

        let response = tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: PROVIDER_NAME,
                timeout: self.config.timeout,
            })?
            .map_err(|e| ProviderError::Unavailable {
                provider: PROVIDER_NAME,
                message: e.to_string(),
            })?;

        let content = response.first_text().unwrap_or_default().to_string();
        debug!(content_len = content.len(), "narrative provider responded");
        Ok(content)
    }
}

impl NarrativeProvider for LlmNarrativeProvider {
    async fn assess_matches(
        &self,
        matches: &[MatchPairContext],
    ) -> Result<MatchAnalysis, ProviderError> {
        let content = self.exec_prompt(match_analysis_prompt(matches)).await?;
        extract_fenced_json(&content)
    }

    async fn assess_prior_art(
        &self,
        context: &PriorArtContext,
    ) -> Result<FreedomAnalysis, ProviderError> {
        let content = self.exec_prompt(prior_art_prompt(context)).await?;
        extract_fenced_json(&content)
    }
}

/// Extracts a JSON document from model output, tolerating ```json fenced
/// code blocks, and deserializes it.
pub fn extract_fenced_json<T: DeserializeOwned>(content: &str) -> Result<T, ProviderError> {
    let payload = if let Some(rest) = content.split_once("```json").map(|(_, rest)| rest) {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = content.split_once("```").map(|(_, rest)| rest) {
        rest.split("```").next().unwrap_or(rest)
    } else {
        content
    };

    serde_json::from_str(payload.trim()).map_err(|e| ProviderError::MalformedResponse {
        provider: PROVIDER_NAME,
        message: e.to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn match_analysis_prompt(matches: &[MatchPairContext]) -> String {
    let matches_context = matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "MATCH {n} (Similarity: {sim:.1}%):\n\
                 Source Claim {src_n} ({src_role}):\n{src_text}\n\n\
                 Target Claim {tgt_n} ({tgt_role}):\n{tgt_text}",
                n = i + 1,
                sim = m.similarity * 100.0,
                src_n = m.source.number,
                src_role = m.source.role(),
                src_text = truncate(&m.source.text, 500),
                tgt_n = m.target.number,
                tgt_role = m.target.role(),
                tgt_text = truncate(&m.target.text, 500),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a patent attorney AI. Analyze these matching patent claims for potential infringement.\n\n\
         {matches_context}\n\n\
         Provide analysis in JSON format:\n\
         {{\n\
             \"summary\": \"Brief overall assessment of infringement risk (2-3 sentences)\",\n\
             \"recommendation\": \"Specific action recommended\",\n\
             \"match_assessments\": [\"Brief assessment for match 1\", \"Brief assessment for match 2\"]\n\
         }}\n\n\
         Focus on:\n\
         1. Whether the claims cover the same technical subject matter\n\
         2. Whether one claim would literally or equivalently infringe the other\n\
         3. Key differences that might avoid infringement\n\n\
         Be precise and technical."
    )
}

fn prior_art_prompt(context: &PriorArtContext) -> String {
    let patents_context = context
        .groups
        .iter()
        .map(|g| {
            format!(
                "PATENT: {number} - {title}\n\
                 Highest similarity: {sim:.1}%\n\
                 Top blocking claim (Claim {claim_n}): {claim_text}",
                number = g.patent_number.as_deref().unwrap_or("Unknown"),
                title = g.title,
                sim = g.max_similarity * 100.0,
                claim_n = g.top_claim_number,
                claim_text = truncate(&g.top_claim_text, 400),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a patent attorney AI. Analyze the freedom to operate for this invention.\n\n\
         INVENTION DESCRIPTION:\n{invention}\n\n\
         POTENTIALLY BLOCKING PRIOR ART:\n{patents_context}\n\n\
         Analyze and respond in JSON format:\n\
         {{\n\
             \"freedom_to_operate\": \"likely|uncertain|unlikely\",\n\
             \"key_risks\": [\"risk 1\", \"risk 2\"],\n\
             \"design_around_suggestions\": [\"suggestion 1\", \"suggestion 2\"],\n\
             \"recommendation\": \"Brief recommendation for next steps\"\n\
         }}\n\n\
         Consider:\n\
         1. How similar are the blocking claims to the invention?\n\
         2. Are there clear differences that could avoid infringement?\n\
         3. What modifications could help design around the prior art?\n\n\
         Be practical and specific.",
        invention = truncate(&context.invention, 1500),
    )
}
