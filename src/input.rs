//! 入力画像の読み込み
//!
//! 画像ファイルをData URLに変換し、ピクセルサイズから
//! 最も近いアスペクト比を判定する。

use crate::error::{PosterAiError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageReader;
use poster_ai_common::{closest_aspect_ratio, to_data_url, AspectRatio};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
}

/// 画像ファイルを読み込む
pub fn load_image(path: &Path) -> Result<SourceImage> {
    if !path.exists() {
        return Err(PosterAiError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let reader = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| PosterAiError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let format = reader.format().ok_or_else(|| {
        PosterAiError::ImageLoad(format!("画像ファイルではありません: {}", path.display()))
    })?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PosterAiError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let aspect_ratio = closest_aspect_ratio(width, height);
    tracing::debug!(path = %path.display(), width, height, ratio = %aspect_ratio, "画像を読み込み");

    Ok(SourceImage {
        data_url: to_data_url(format.to_mime_type(), &STANDARD.encode(&bytes)),
        width,
        height,
        aspect_ratio,
    })
}
