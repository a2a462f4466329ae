//! Keyword suggestion adapter.
//!
//! Calls a Gemini-style `generateContent` endpoint with a structured
//! output schema and normalizes the response into word entries. The call
//! is a single attempt: any failure (network, HTTP status, malformed or
//! non-conforming payload) fails the whole invocation and the caller's
//! word list stays untouched — partial results are never produced.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::{Error, Result};
use crate::now_millis;
use crate::words::{IdGen, Word};

/// Default generation service base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Default generation model id.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Weight range the structured-output schema asks the service for.
const WEIGHT_RANGE: std::ops::RangeInclusive<f32> = 1.0..=5.0;

/// Connection settings for the suggestion service.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Service base URL; the model path is joined onto it
    pub endpoint: Url,
    pub model: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl SuggestConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| Error::Config(format!("invalid endpoint: {}", e)))?;
        Ok(Self {
            endpoint,
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout_ms: 30000,
        })
    }

    /// Read the API key from `LIGHTCLOUD_API_KEY` (fallback `API_KEY`).
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("LIGHTCLOUD_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| Error::Config("LIGHTCLOUD_API_KEY is not set".to_string()))?;
        Self::new(key)
    }
}

/// Client for the external keyword generation service.
pub struct SuggestionClient {
    client: Client,
    config: SuggestConfig,
}

impl SuggestionClient {
    pub fn new(config: SuggestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Generate 15–20 weighted keywords for `topic`.
    ///
    /// Single attempt per invocation; retrying is a caller decision.
    pub fn suggest(&self, topic: &str) -> Result<Vec<Word>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::EmptyInput);
        }

        let url = self
            .config
            .endpoint
            .join(&format!("models/{}:generateContent", self.config.model))
            .map_err(|e| Error::Config(format!("invalid endpoint: {}", e)))?;

        debug!("requesting keyword suggestions for topic {:?}", topic);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(topic))
            .send()
            .map_err(|e| Error::Network(format!("suggestion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Generation(format!("service returned {}", status)));
        }

        let payload: GenerateResponse = response
            .json()
            .map_err(|e| Error::Generation(format!("unreadable response: {}", e)))?;
        let text = payload
            .first_text()
            .ok_or_else(|| Error::Generation("response carried no content".to_string()))?;

        let raw: Vec<RawKeyword> = serde_json::from_str(&text)
            .map_err(|e| Error::Generation(format!("malformed keyword JSON: {}", e)))?;

        keywords_to_words(raw, now_millis())
    }
}

/// Prompt plus structured-output schema for one topic.
fn request_body(topic: &str) -> serde_json::Value {
    let prompt = format!(
        "针对主题 \"{}\"，生成 15-20 个高度相关的中文关键词。\n\
         每个关键词应包含一个权重值（1 到 5 之间，5 代表最重要）。\n\
         请确保关键词多样化且具有代表性。",
        topic
    );
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING", "description": "关键词文本" },
                        "weight": { "type": "NUMBER", "description": "权重，1-5" }
                    },
                    "required": ["text", "weight"]
                }
            }
        }
    })
}

/// One entry of the service's structured output.
#[derive(Debug, Deserialize)]
struct RawKeyword {
    text: String,
    weight: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.clone())
            .find(|t| !t.trim().is_empty())
    }
}

/// Map raw entries into words, rejecting the whole batch on any
/// non-conforming entry.
fn keywords_to_words(raw: Vec<RawKeyword>, stamp: u128) -> Result<Vec<Word>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, kw)| {
            let text = kw.text.trim().to_string();
            if text.is_empty() {
                return Err(Error::Generation(format!(
                    "keyword {} has empty text",
                    index
                )));
            }
            if !kw.weight.is_finite() || !WEIGHT_RANGE.contains(&kw.weight) {
                return Err(Error::Generation(format!(
                    "keyword {:?} weight {} is outside 1-5",
                    text, kw.weight
                )));
            }
            Ok(Word {
                id: IdGen::suggested(index, stamp),
                text,
                weight: kw.weight,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, weight: f32) -> RawKeyword {
        RawKeyword {
            text: text.to_string(),
            weight,
        }
    }

    #[test]
    fn maps_entries_in_order_with_stamped_ids() {
        let words =
            keywords_to_words(vec![raw("体育", 5.0), raw("足球", 3.5)], 99).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].id, "ai-0-99");
        assert_eq!(words[0].text, "体育");
        assert_eq!(words[1].id, "ai-1-99");
        assert_eq!(words[1].weight, 3.5);
    }

    #[test]
    fn rejects_out_of_range_weights() {
        let err = keywords_to_words(vec![raw("ok", 2.0), raw("bad", 7.0)], 0).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        let err = keywords_to_words(vec![raw("bad", 0.0)], 0).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        let err = keywords_to_words(vec![raw("bad", f32::NAN)], 0).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn rejects_blank_text() {
        let err = keywords_to_words(vec![raw("  ", 3.0)], 0).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn first_text_walks_candidates_and_parts() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    { "content": { "parts": [ { "text": "" }, { "text": "[{\"text\":\"AI\",\"weight\":5}]" } ] } }
                ]
            }"#,
        )
        .unwrap();
        let text = payload.first_text().unwrap();
        let raw: Vec<RawKeyword> = serde_json::from_str(&text).unwrap();
        assert_eq!(raw[0].text, "AI");
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let payload: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.first_text().is_none());
    }

    #[test]
    fn request_body_carries_schema_and_topic() {
        let body = request_body("体育");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("体育"));
        assert!(prompt.contains("15-20"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["items"]["required"][0],
            "text"
        );
    }

    #[test]
    fn blank_topic_is_rejected_before_any_request() {
        let client = SuggestionClient::new(SuggestConfig::new("k").unwrap()).unwrap();
        assert!(matches!(client.suggest("   "), Err(Error::EmptyInput)));
    }
}
