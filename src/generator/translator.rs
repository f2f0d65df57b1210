use super::Generator;
use futures::future::join_all;
use poster_ai_common::{build_translation_prompt, DishInput};

/// 翻訳できなかったときの説明文
pub fn fallback_translation(name: &str, keywords: &str) -> String {
    format!("{} {}", name, keywords)
}

impl Generator {
    /// 料理名とキーワードを英語の説明文に変換
    ///
    /// キー未設定ならリモート呼び出しをせず即フォールバック。
    /// 呼び出し失敗・空応答もフォールバックで、呼び出し元にエラーは返さない。
    pub async fn translate(&self, name: &str, keywords: &str) -> String {
        let Some(api_key) = self.credentials.api_key() else {
            return fallback_translation(name, keywords);
        };

        let prompt = build_translation_prompt(name, keywords);
        match self
            .service
            .generate_text(&api_key, &self.models.text, &prompt)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => fallback_translation(name, keywords),
            Err(e) => {
                tracing::warn!(error = %e, dish = name, "翻訳に失敗、フォールバックを使用");
                fallback_translation(name, keywords)
            }
        }
    }

    /// 全料理を並行して翻訳（入力順を保持）
    ///
    /// 各タスクは必ず値を返すため、部分失敗は発生しない。
    /// 料理名が空のスロットは翻訳せずそのまま返す。
    pub async fn translate_dishes(&self, dishes: &[DishInput]) -> Vec<DishInput> {
        let tasks = dishes.iter().map(|dish| async move {
            if dish.name.is_empty() {
                return dish.clone();
            }
            let translated = self.translate(&dish.name, &dish.keywords).await;
            DishInput {
                translated_prompt: Some(translated),
                ..dish.clone()
            }
        });
        join_all(tasks).await
    }
}
