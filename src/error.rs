use thiserror::Error;

/// 権限エラーを示す応答テキスト中のトークン
const PERMISSION_TOKENS: &[&str] = &["403", "PERMISSION_DENIED"];

#[derive(Error, Debug)]
pub enum PosterAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`poster-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("結果が見つかりません: {0}")]
    ItemNotFound(String),

    #[error("保存容量を超えています: {size} bytes (上限 {quota} bytes)")]
    StorageQuotaExceeded { size: u64, quota: u64 },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIPエラー: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Common(#[from] poster_ai_common::Error),
}

impl PosterAiError {
    /// 権限エラー（403 / PERMISSION_DENIED）か
    ///
    /// 表示文字列の部分一致で判定する。
    pub fn is_permission_denied(&self) -> bool {
        let message = self.to_string();
        PERMISSION_TOKENS.iter().any(|token| message.contains(token))
    }
}

impl From<reqwest::Error> for PosterAiError {
    fn from(e: reqwest::Error) -> Self {
        PosterAiError::ApiCall(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PosterAiError>;
