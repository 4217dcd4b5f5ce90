//! generateContent request/response wire types
//!
//! Only the fields this service reads or writes are modelled. Every response
//! field is optional so a structurally wrong reply surfaces as
//! [`LlmError::MalformedResponse`](super::LlmError) rather than a serde error.

use serde::{Deserialize, Serialize};

/// Single-turn request body: `{"contents":[{"parts":[{"text": ...}]}]}`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// A request whose only content is the given user text
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, naming the first missing step on failure
    pub fn into_text(self) -> Result<String, String> {
        let candidate = self
            .candidates
            .ok_or("missing 'candidates'")?
            .into_iter()
            .next()
            .ok_or("'candidates' is empty")?;
        let part = candidate
            .content
            .ok_or("missing 'candidates[0].content'")?
            .parts
            .ok_or("missing 'candidates[0].content.parts'")?
            .into_iter()
            .next()
            .ok_or("'candidates[0].content.parts' is empty")?;
        part.text.ok_or_else(|| "missing 'candidates[0].content.parts[0].text'".to_string())
    }
}
