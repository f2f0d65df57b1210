//! アスペクト比の判定
//!
//! Gemini imageConfig.aspectRatio が受け付ける5種類のみを扱う。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// 判定順（同値の場合は先に出てくるものを採用）
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
        }
    }

    /// 幅/高さ
    pub fn value(&self) -> f64 {
        match self {
            AspectRatio::Square => 1.0,
            AspectRatio::Portrait3x4 => 3.0 / 4.0,
            AspectRatio::Landscape4x3 => 4.0 / 3.0,
            AspectRatio::Portrait9x16 => 9.0 / 16.0,
            AspectRatio::Landscape16x9 => 16.0 / 9.0,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown aspect ratio: {}. Use 1:1, 3:4, 4:3, 9:16, or 16:9", s))
    }
}

/// 画像サイズに最も近いアスペクト比を返す
///
/// 高さ0の画像は正方形として扱う。
pub fn closest_aspect_ratio(width: u32, height: u32) -> AspectRatio {
    if height == 0 {
        return AspectRatio::Square;
    }
    closest_to_ratio(width as f64 / height as f64)
}

/// 幅/高さの比に最も近いアスペクト比（差が等しければ判定順で先のもの）
pub fn closest_to_ratio(ratio: f64) -> AspectRatio {
    let mut best = AspectRatio::ALL[0];
    for candidate in AspectRatio::ALL.into_iter().skip(1) {
        if (candidate.value() - ratio).abs() < (best.value() - ratio).abs() {
            best = candidate;
        }
    }
    best
}
