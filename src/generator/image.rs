use super::Generator;
use crate::error::Result;
use crate::gemini::{first_inline_image, ImageConfig, Part};
use poster_ai_common::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, AspectRatio, Resolution,
};

/// ポスター生成時のアスペクト比
pub const POSTER_ASPECT_RATIO: AspectRatio = AspectRatio::Portrait9x16;

/// 編集時は常に高解像度
pub const EDIT_IMAGE_SIZE: &str = "2K";

/// Data URL（またはBase64そのもの）をインラインパートに変換
fn inline_part(image: &str) -> Part {
    let data = extract_base64_from_data_url(image).unwrap_or(image);
    Part::inline(extract_mime_type_from_data_url(image), data)
}

impl Generator {
    /// プロンプトからポスター画像を生成
    ///
    /// 参照画像があればテキストより前にインラインで送る。
    /// 画像パートがなければ `Ok(None)`。リモートのエラーはそのまま返す。
    pub async fn generate_image(
        &self,
        prompt: &str,
        resolution: Resolution,
        reference_image: Option<&str>,
    ) -> Result<Option<String>> {
        let api_key = self.credentials.require_api_key()?;

        let mut parts = Vec::with_capacity(2);
        if let Some(reference) = reference_image {
            parts.push(inline_part(reference));
        }
        parts.push(Part::text(prompt));

        let image_config = ImageConfig {
            aspect_ratio: POSTER_ASPECT_RATIO,
            image_size: resolution.image_size().to_string(),
        };

        let response = self
            .service
            .generate_content(&api_key, &self.models.image, parts, image_config)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "画像生成エラー"))?;

        Ok(first_inline_image(&response))
    }

    /// 元画像を指示文に従って編集
    pub async fn edit_image(
        &self,
        source_image: &str,
        instruction: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<String>> {
        let api_key = self.credentials.require_api_key()?;

        let parts = vec![inline_part(source_image), Part::text(instruction)];
        let image_config = ImageConfig {
            aspect_ratio,
            image_size: EDIT_IMAGE_SIZE.to_string(),
        };

        let response = self
            .service
            .generate_content(&api_key, &self.models.image, parts, image_config)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "画像編集エラー"))?;

        Ok(first_inline_image(&response))
    }
}
