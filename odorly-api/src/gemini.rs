//! Generative comment backend.
//!
//! Proxies the odor percentage to Google's Gemini API and returns a one-line
//! comment. The backend sits behind a trait so handlers can be exercised with
//! a stub instead of a live key.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default upstream model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "GEMINI_MODEL";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Builds the comment prompt for a given odor percentage.
///
/// Below 20% the reader gets a cheerleader; at or above, a roaster.
pub fn comment_prompt(bo: f64) -> String {
    if bo < 20.0 {
        format!(
            "You are a friendly cheerleader. Someone’s body odor level is only {bo}%. \
             Give them a short, nice, encouraging one-liner under 20 words."
        )
    } else {
        format!(
            "You are a witty roaster. Someone’s body odor level is {bo}%. \
             Make a short, funny, slightly offensive one-liner under 20 words."
        )
    }
}

/// A source of generated comments.
#[async_trait]
pub trait CommentBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini REST client (`generateContent` over the v1beta API).
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Builds a client from `GEMINI_API_KEY` and `GEMINI_MODEL`.
    /// Returns `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(api_key, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CommentBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?
            .error_for_status()
            .context("Gemini returned an error status")?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Gemini response was not valid JSON")?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| anyhow!("Gemini response contained no candidates"))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}
