//! APIキーの可用性管理
//!
//! ホスト側のキー確認・選択機能を `KeySource` として注入し、
//! 「キーあり」フラグの遷移を `Credentials` に集約する:
//! - 起動時の確認でセット
//! - 権限エラー検出でクリア
//! - 対話的選択の成功でセット

use crate::config::Config;
use crate::error::{PosterAiError, Result};
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// ホストが提供するキー機能
pub trait KeySource: Send + Sync {
    /// 現在使えるAPIキー
    fn api_key(&self) -> Option<String>;

    /// キーが選択済みか（ホストの確認機能）
    fn has_selected_key(&self) -> Result<bool> {
        Ok(self.api_key().is_some())
    }

    /// キーを対話的に選択させる
    fn open_select_key(&self) -> Result<()>;
}

/// 設定ファイル + 環境変数からキーを読み、端末で入力を受け付ける
pub struct ConfigKeySource {
    config: Mutex<Config>,
}

impl ConfigKeySource {
    pub fn new(config: Config) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl KeySource for ConfigKeySource {
    fn api_key(&self) -> Option<String> {
        self.config.lock().ok().and_then(|c| c.get_api_key())
    }

    fn open_select_key(&self) -> Result<()> {
        if !std::io::stdin().is_terminal() {
            return Err(PosterAiError::Config(
                "対話的なAPIキー選択が利用できません。GEMINI_API_KEY を設定してください".into(),
            ));
        }

        let key: String = dialoguer::Password::new()
            .with_prompt("Gemini APIキー")
            .interact()
            .map_err(|e| PosterAiError::Config(format!("APIキー入力エラー: {}", e)))?;

        let mut config = self
            .config
            .lock()
            .map_err(|_| PosterAiError::Config("設定のロックに失敗".into()))?;
        config.set_api_key(key.trim().to_string())
    }
}

/// 固定キー（テスト・`--api-key` 指定用）
#[derive(Debug, Default)]
pub struct StaticKeySource {
    key: Mutex<Option<String>>,
    /// open_select_key で設定されるキー
    selectable: Option<String>,
}

impl StaticKeySource {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: Mutex::new(key),
            selectable: None,
        }
    }

    /// 選択時にこのキーが入るようにする
    pub fn with_selectable(mut self, key: impl Into<String>) -> Self {
        self.selectable = Some(key.into());
        self
    }
}

impl KeySource for StaticKeySource {
    fn api_key(&self) -> Option<String> {
        self.key.lock().ok().and_then(|k| k.clone())
    }

    fn open_select_key(&self) -> Result<()> {
        let selected = self
            .selectable
            .clone()
            .ok_or_else(|| PosterAiError::Config("APIキー選択が利用できません".into()))?;
        if let Ok(mut key) = self.key.lock() {
            *key = Some(selected);
        }
        Ok(())
    }
}

/// プロセス全体のキー状態
pub struct Credentials {
    source: Arc<dyn KeySource>,
    has_key: AtomicBool,
}

impl Credentials {
    /// 起動時にキーの有無を確認
    ///
    /// ホストの確認機能が失敗した場合はキーの有無で代用する。
    pub fn detect(source: Arc<dyn KeySource>) -> Self {
        let has_key = match source.has_selected_key() {
            Ok(selected) => selected,
            Err(e) => {
                tracing::warn!(error = %e, "APIキー確認に失敗、キーの有無で判定します");
                source.api_key().is_some()
            }
        };
        tracing::debug!(has_key, "APIキー状態を初期化");
        Self {
            source,
            has_key: AtomicBool::new(has_key),
        }
    }

    pub fn has_key(&self) -> bool {
        self.has_key.load(Ordering::SeqCst)
    }

    pub fn api_key(&self) -> Option<String> {
        self.source.api_key()
    }

    /// APIキーを要求（なければ MissingApiKey）
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or(PosterAiError::MissingApiKey)
    }

    /// 権限エラー検出時にキー状態をクリア
    pub fn revoke(&self) {
        tracing::warn!("権限エラーのためAPIキー状態をクリア");
        self.has_key.store(false, Ordering::SeqCst);
    }

    /// 対話的にキーを選択し、成功したらキーありにする
    pub fn select(&self) -> Result<()> {
        self.source.open_select_key()?;
        self.has_key.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_and_revoke() {
        let credentials = Credentials::detect(Arc::new(StaticKeySource::new(Some("k".into()))));
        assert!(credentials.has_key());
        credentials.revoke();
        assert!(!credentials.has_key());
        assert_eq!(credentials.require_api_key().unwrap(), "k");
    }

    #[test]
    fn test_missing_key() {
        let credentials = Credentials::detect(Arc::new(StaticKeySource::new(None)));
        assert!(!credentials.has_key());
        assert!(matches!(
            credentials.require_api_key(),
            Err(PosterAiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_select_sets_flag() {
        let source = StaticKeySource::new(None).with_selectable("picked");
        let credentials = Credentials::detect(Arc::new(source));
        credentials.select().unwrap();
        assert!(credentials.has_key());
        assert_eq!(credentials.api_key().as_deref(), Some("picked"));
    }

    #[test]
    fn test_select_unavailable_keeps_flag() {
        let credentials = Credentials::detect(Arc::new(StaticKeySource::new(None)));
        assert!(credentials.select().is_err());
        assert!(!credentials.has_key());
    }
}
