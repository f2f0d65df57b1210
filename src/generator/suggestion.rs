use super::Generator;
use crate::error::{PosterAiError, Result};
use poster_ai_common::{
    build_suggestion_prompt, parse_suggestion_response, suggestion_schema, DishPatch,
};

/// サジェスト結果の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// モデルの応答
    Model,
    /// 呼び出し失敗による定型文
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub patch: DishPatch,
    pub source: SuggestionSource,
}

/// 定型のサジェスト（入力名をそのまま返す）
pub fn fallback_suggestion(partial_name: &str) -> DishPatch {
    DishPatch {
        name: Some(partial_name.to_string()),
        keywords: Some("delicious, premium, fresh, cinematic lighting".into()),
        tag: Some("Specialty".into()),
        slogan: Some("美味佳肴".into()),
    }
}

impl Generator {
    /// 料理プロフィールをサジェスト
    ///
    /// キー未設定のみ `MissingApiKey` を返す。それ以外の失敗は
    /// ログを出して定型文（`SuggestionSource::Fallback`）を返す。
    pub async fn suggest(&self, partial_name: &str) -> Result<Suggestion> {
        let api_key = self.credentials.require_api_key()?;

        match self.request_suggestion(&api_key, partial_name).await {
            Ok(patch) => Ok(Suggestion {
                patch,
                source: SuggestionSource::Model,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "サジェストに失敗、定型文を使用");
                Ok(Suggestion {
                    patch: fallback_suggestion(partial_name),
                    source: SuggestionSource::Fallback,
                })
            }
        }
    }

    async fn request_suggestion(&self, api_key: &str, partial_name: &str) -> Result<DishPatch> {
        let prompt = build_suggestion_prompt(partial_name);
        let text = self
            .service
            .generate_json(api_key, &self.models.text, &prompt, &suggestion_schema())
            .await?;
        parse_suggestion_response(&text).map_err(|e| PosterAiError::ApiParse(e.to_string()))
    }
}
