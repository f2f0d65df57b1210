//! Gemini API連携
//!
//! リモート生成サービスの3つの呼び出し形:
//! - generate_text: テキスト補完
//! - generate_json: スキーマ指定の構造化出力
//! - generate_content: 画像を含むマルチモーダル生成
//!
//! 実装は `GeminiClient`（reqwest）。テストでは差し替える。

mod client;

pub use client::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;
use poster_ai_common::{to_data_url, AspectRatio};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// リクエストのパート
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// インライン画像（Base64）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.data)
    }
}

/// generationConfig.imageConfig
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    pub image_size: String,
}

/// レスポンスのパート
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

/// 最初の画像パートをData URLとして取り出す
pub fn first_inline_image(parts: &[ResponsePart]) -> Option<String> {
    parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
        .map(InlineData::to_data_url)
}

/// リモート生成サービス
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// テキスト補完
    async fn generate_text(&self, api_key: &str, model: &str, prompt: &str) -> Result<String>;

    /// スキーマ指定の構造化出力（JSONテキストを返す）
    async fn generate_json(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String>;

    /// マルチモーダル生成（0個以上のパートを返す）
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
        image_config: ImageConfig,
    ) -> Result<Vec<ResponsePart>>;
}
