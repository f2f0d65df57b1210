//! リモート呼び出しのラッパー
//!
//! - translator: 料理名の英訳（失敗時はフォールバック、エラーにしない）
//! - suggestion: 料理プロフィールのサジェスト（キー未設定のみエラー）
//! - image: 画像生成・編集（エラーはそのまま呼び出し元へ）

mod image;
mod suggestion;
mod translator;

pub use image::{EDIT_IMAGE_SIZE, POSTER_ASPECT_RATIO};
pub use suggestion::{fallback_suggestion, Suggestion, SuggestionSource};
pub use translator::fallback_translation;

use crate::config::Config;
use crate::credentials::Credentials;
use crate::gemini::GenerativeService;
use std::sync::Arc;

/// 使用モデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    pub text: String,
    pub image: String,
}

impl Default for Models {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Models {
    fn from(config: &Config) -> Self {
        Self {
            text: config.text_model.clone(),
            image: config.image_model.clone(),
        }
    }
}

/// ラッパー群の共通コンテキスト
#[derive(Clone)]
pub struct Generator {
    service: Arc<dyn GenerativeService>,
    credentials: Arc<Credentials>,
    models: Models,
}

impl Generator {
    pub fn new(
        service: Arc<dyn GenerativeService>,
        credentials: Arc<Credentials>,
        models: Models,
    ) -> Self {
        Self {
            service,
            credentials,
            models,
        }
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }
}
