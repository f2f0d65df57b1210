use crate::error::{PosterAiError, Result};
use poster_ai_common::Resolution;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIキーを読む環境変数（先勝ち）
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// 翻訳・サジェスト用モデル
    pub text_model: String,
    /// 画像生成・編集用モデル
    pub image_model: String,
    /// 結果履歴の保存先（省略時は ~/.local/share/poster-ai）
    pub data_dir: Option<PathBuf>,
    /// 結果履歴の保存上限（バイト）
    pub storage_quota_bytes: Option<u64>,
    pub default_resolution: Resolution,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            text_model: "gemini-3-flash-preview".into(),
            image_model: "gemini-3-pro-image-preview".into(),
            data_dir: None,
            storage_quota_bytes: Some(5 * 1024 * 1024), // ブラウザのlocalStorage相当
            default_resolution: Resolution::Hd,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PosterAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("poster-ai").join("config.json"))
    }

    /// 結果履歴の保存ディレクトリ
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| PosterAiError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("poster-ai"))
    }

    /// APIキーを取得（環境変数を優先）
    pub fn get_api_key(&self) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
