//! reqwestによるGemini REST実装

use super::{GenerativeService, ImageConfig, Part, ResponsePart};
use crate::error::{PosterAiError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

impl GeminiResponse {
    /// 最初の候補のパート
    fn into_first_parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_base_url(GEMINI_API_BASE)
    }

    /// エンドポイントを差し替える（プロキシ・モックサーバ用）
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }

    /// Gemini API呼び出し（共通処理）
    async fn call(&self, api_key: &str, model: &str, body: &Value) -> Result<GeminiResponse> {
        tracing::debug!(model, "Gemini API呼び出し");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PosterAiError::ApiCall(format!(
                "API error: {}: {}",
                status.as_u16(),
                text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| PosterAiError::ApiParse(format!("レスポンス解析エラー: {}", e)))
    }

    fn first_text(parts: &[ResponsePart]) -> Result<String> {
        let text = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(PosterAiError::ApiParse("Empty response".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_text(&self, api_key: &str, model: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self.call(api_key, model, &body).await?;
        Self::first_text(&response.into_first_parts())
    }

    async fn generate_json(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        let response = self.call(api_key, model, &body).await?;
        Self::first_text(&response.into_first_parts())
    }

    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
        image_config: ImageConfig,
    ) -> Result<Vec<ResponsePart>> {
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "imageConfig": image_config
            }
        });
        let response = self.call(api_key, model, &body).await?;
        Ok(response.into_first_parts())
    }
}
