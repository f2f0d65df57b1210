//! スタイル・レイアウトのカタログ
//!
//! 固定の参照テーブルのみ。ロジックはルックアップだけ。

use crate::types::{LayoutType, StyleOption};

/// スタイル選択肢
pub const STYLE_OPTIONS: &[StyleOption] = &[
    StyleOption {
        id: "modern_minimal",
        name: "Modern Minimal Studio (现代极简)",
        prompt_segment: "Modern minimal studio photography, soft neutral background, high-end commercial food styling, clean lighting, elegant atmosphere",
    },
    StyleOption {
        id: "jiangnan_garden",
        name: "Jiangnan Garden Premium (江南园林)",
        prompt_segment: "Jiangnan garden mood, traditional Chinese aesthetics, premium tea house vibe, poetic soft lighting, elegant porcelain textures, subtle mist",
    },
    StyleOption {
        id: "retro_travel",
        name: "Retro Travel Poster (复古海报)",
        prompt_segment: "Retro travel poster style, vintage textured paper effect, bold simplified shapes, nostalgic color palette, lithograph print texture",
    },
    StyleOption {
        id: "night_market",
        name: "Night Market Neon (夜市霓虹)",
        prompt_segment: "Cyberpunk night market vibe, neon signage reflections, dramatic contrast, steam and smoke, vibrant appetizing colors, street food culture",
    },
    StyleOption {
        id: "luxury_black_gold",
        name: "Luxury Black Gold (黑金奢华)",
        prompt_segment: "Luxury black and gold theme, premium fine dining, dark moody background with gold accents, dramatic rim lighting, sophisticated atmosphere",
    },
    StyleOption {
        id: "soft_illustration",
        name: "Soft Illustration Cute (插画可爱)",
        prompt_segment: "Soft warm illustration style, cute and family-friendly, pastel colors, gentle brushstrokes, cozy appetizing feeling",
    },
];

/// 全プロンプト共通の先頭フレーズ
pub const BASE_PROMPT: &str = "vertical digital food poster, full-bleed edge-to-edge borderless, premium food advertising, strong hierarchy, clean grid layout";

/// 文字なしモードの禁止事項
pub const NEGATIVE_CONSTRAINTS: &str = "borderless, no frame, no margin, no poster border, reserved blank headline areas, reserved blank info block, no readable text, no logos, no watermark, no QR codes";

/// カスタムスタイル使用時のスタイル名
pub const CUSTOM_STYLE_NAME: &str = "Custom";

/// 画像編集モードのスタイル名
pub const IMAGE_EDIT_STYLE_NAME: &str = "Image Edit";

impl LayoutType {
    /// レイアウトの構図説明
    pub fn description(&self) -> &'static str {
        match self {
            LayoutType::Layout1 => "Layout structure: Single large central composition. Top corners reserved for headlines. One large circular dish image placed centrally slightly top. Bottom area clear for secondary text. Bottom-right reserved for CTA block.",
            LayoutType::Layout2 => "Layout structure: Asymmetric split. Left narrow column reserved for vertical text. Right wide area features one large circular dish image fully contained on the right side. Bottom-right reserved for CTA block.",
            LayoutType::Layout3 => "Layout structure: Symmetrical dual composition. Two equal-sized circular dish images aligned horizontally in the middle. Top areas reserved for headlines. Bottom areas reserved for descriptions. Bottom-right reserved for CTA block.",
            LayoutType::Layout4 => "Layout structure: Matrix grid of six. Two vertical columns of three circular dishes each. Uniform spacing. Small blank label areas next to each circle. Bottom-right reserved for CTA block.",
        }
    }
}

/// IDからスタイルを検索
pub fn find_style(id: &str) -> Option<&'static StyleOption> {
    STYLE_OPTIONS.iter().find(|s| s.id == id)
}

/// スタイル選択（プリセット or カスタム）
///
/// カスタム文字列が空白でなければ常にカスタムが優先される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSelection {
    pub preset_id: String,
    pub custom: String,
}

impl Default for StyleSelection {
    fn default() -> Self {
        Self {
            preset_id: STYLE_OPTIONS[0].id.to_string(),
            custom: String::new(),
        }
    }
}

impl StyleSelection {
    pub fn preset(id: impl Into<String>) -> Self {
        Self {
            preset_id: id.into(),
            custom: String::new(),
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            custom: text.into(),
            ..Default::default()
        }
    }

    fn is_custom(&self) -> bool {
        !self.custom.trim().is_empty()
    }

    /// プロンプトに埋め込むスタイル文
    pub fn prompt_text(&self) -> String {
        if self.is_custom() {
            return self.custom.clone();
        }
        find_style(&self.preset_id)
            .map(|s| s.prompt_segment.to_string())
            .unwrap_or_default()
    }

    /// 結果に記録するスタイル名
    pub fn display_name(&self) -> String {
        if self.is_custom() {
            return CUSTOM_STYLE_NAME.to_string();
        }
        find_style(&self.preset_id)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
