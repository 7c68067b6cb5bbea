// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Portfolio insight from a generative model.
//!
//! The service is optional. Whatever goes wrong (no key, network, a reply
//! that is not the expected JSON), callers get [`Insight::fallback`].

use crate::error::{NesteggError, Result};
use crate::ledger::AssetSummary;
use crate::utils::http_client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "NESTEGG_AI_MODEL";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub risk_level: String,
}

impl Insight {
    pub fn fallback() -> Self {
        Insight {
            summary: "AI analysis is unavailable right now. Your data is unchanged.".to_string(),
            suggestions: vec![
                "Keep an emergency fund covering three to six months of expenses.".to_string(),
                "Review your asset allocation and pay down high-interest debt first.".to_string(),
                "Update asset values regularly so the net worth trend stays accurate.".to_string(),
            ],
            risk_level: "unknown".to_string(),
        }
    }
}

pub trait InsightProvider {
    fn analyze(&self, assets: &[AssetSummary]) -> Result<Insight>;
}

/// Runs the provider and swallows any failure into the fallback insight.
pub fn generate_insight(
    provider: Option<&dyn InsightProvider>,
    assets: &[AssetSummary],
) -> Insight {
    let Some(p) = provider else {
        warn!("no insight provider configured, using fallback");
        return Insight::fallback();
    };
    match p.analyze(assets) {
        Ok(insight) => insight,
        Err(err) => {
            warn!(%err, "insight request failed, using fallback");
            Insight::fallback()
        }
    }
}

pub fn build_prompt(assets: &[AssetSummary]) -> String {
    let mut prompt = String::from(
        "You are a personal finance advisor. Analyze the following asset list \
         (liabilities are listed under the 负债 category).\n\n",
    );
    if assets.is_empty() {
        prompt.push_str("(no assets recorded yet)\n");
    }
    for a in assets {
        prompt.push_str(&format!("- {} [{}]: {:.2}\n", a.name, a.category, a.value));
    }
    prompt.push_str(
        "\nReply with JSON only, using exactly these keys: \
         {\"summary\": string, \"suggestions\": string[], \
         \"riskLevel\": \"low\" | \"medium\" | \"high\"}",
    );
    prompt
}

/// Extracts the insight object from model output, tolerating code fences
/// and prose around the JSON.
pub fn parse_insight_text(text: &str) -> Result<Insight> {
    let start = text.find('{');
    let end = text.rfind('}');
    let body = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => return Err(NesteggError::Insight("reply contains no JSON object".into())),
    };
    let insight: Insight = serde_json::from_str(body)?;
    if insight.summary.trim().is_empty() {
        return Err(NesteggError::Insight("reply has an empty summary".into()));
    }
    Ok(insight)
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        GeminiClient {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Reads the key and model from the environment; `None` without a key.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
        let model = std::env::var(MODEL_ENV)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Some(Self::new(key, model))
    }
}

impl InsightProvider for GeminiClient {
    fn analyze(&self, assets: &[AssetSummary]) -> Result<Insight> {
        let url = format!("{ENDPOINT}/{}:generateContent", self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(assets) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        debug!(model = %self.model, assets = assets.len(), "requesting insight");
        let client = http_client()?;
        let resp: GenerateResponse = client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        let text: String = resp
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
            .ok_or_else(|| NesteggError::Insight("reply has no candidates".into()))?;
        parse_insight_text(&text)
    }
}
