//! Google Gemini implementation of [`QuestionSource`] over the REST API.

use std::sync::OnceLock;

use async_trait::async_trait;
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use super::models::{QuestionRecord, QuestionRequest};
use super::prompt::build_prompt;
use super::source::{QuestionSource, SourceError};
use crate::config::AppConfig;

const GENERATE_METHOD: &str = "generateContent";
const MODELS_PAGE_SIZE: &str = "1000";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.base_url, self.model, GENERATE_METHOD
        )
    }

    fn models_request(&self, page_token: Option<&str>) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(format!("{}/v1beta/models", self.base_url))
            .query(&[("pageSize", MODELS_PAGE_SIZE)]);
        match page_token {
            Some(token) => request.query(&[("pageToken", token)]),
            None => request,
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SourceError> {
        let response = request
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl QuestionSource for GeminiClient {
    async fn generate(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<QuestionRecord>, SourceError> {
        info!(
            "Requesting {} {:?} questions on '{} / {}' from {}",
            request.count, request.question_type, request.topic, request.sub_topic, self.model
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": build_prompt(request) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response: GenerateContentResponse = self
            .send_json(self.http.post(self.generate_url()).json(&body))
            .await?;

        let text = extract_text(response)?;
        debug!("Gemini returned {} bytes of text", text.len());
        let questions = parse_questions(&text)?;
        info!("Gemini produced {} questions", questions.len());
        Ok(questions)
    }

    async fn list_models(&self) -> Result<Vec<String>, SourceError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let request = self.models_request(page_token.as_deref());
            let page: ListModelsResponse = self.send_json(request).await?;
            models.extend(usable_models(page.models));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Concatenated text of the first candidate. A response with no parts (typically
/// safety-filtered) is an error.
fn extract_text(response: GenerateContentResponse) -> Result<String, SourceError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = block_reason.unwrap_or_else(|| "none".to_string());
        warn!("Gemini returned no candidates (block reason: {})", reason);
        return Err(SourceError::EmptyResponse(reason));
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        let reason = block_reason
            .or(candidate.finish_reason)
            .unwrap_or_else(|| "none".to_string());
        warn!("Gemini returned an empty candidate (reason: {})", reason);
        return Err(SourceError::EmptyResponse(reason));
    }

    Ok(parts.into_iter().filter_map(|part| part.text).collect())
}

/// Strip Markdown code fences the model sometimes wraps around JSON.
fn clean_response_text(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"```(?:json|JSON)?").expect("valid fence regex"));
    fence.replace_all(text.trim(), "").trim().to_string()
}

fn parse_questions(text: &str) -> Result<Vec<QuestionRecord>, SourceError> {
    let cleaned = clean_response_text(text);
    if cleaned.is_empty() {
        warn!("Gemini text was blank after cleanup");
        return Err(SourceError::EmptyText);
    }

    let value: Value = serde_json::from_str(&cleaned)?;
    let questions = match value {
        array @ Value::Array(_) => array,
        Value::Object(mut map) => map
            .remove("questions")
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    };

    Ok(serde_json::from_value(questions)?)
}

fn usable_models(models: Vec<ModelInfo>) -> impl Iterator<Item = String> {
    models
        .into_iter()
        .filter(|model| {
            model
                .supported_generation_methods
                .iter()
                .any(|method| method == GENERATE_METHOD)
        })
        .map(|model| {
            model
                .name
                .strip_prefix("models/")
                .map(str::to_string)
                .unwrap_or(model.name)
        })
}
