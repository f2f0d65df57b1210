//! ポスター生成の型定義
//!
//! CLIと将来のWeb(WASM)フロントで共有される型:
//! - AppMode / LayoutType: 生成モードとレイアウト
//! - DishInput / DishPatch: 料理ごとの入力と部分更新
//! - GeneratedItem: 1回の生成リクエストの記録（プロンプト・結果・状態）
//! - GenerationConfig: 解像度などの生成設定

use serde::{Deserialize, Serialize};

/// 生成モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    /// プロンプトのみ生成（Midjourney用、文字なし）
    #[default]
    Midjourney,
    /// Gemini画像生成（文字入りポスター）
    NanoBanana,
    /// 既存画像の編集
    ImageEdit,
}

impl AppMode {
    pub const ALL: [AppMode; 3] = [AppMode::Midjourney, AppMode::NanoBanana, AppMode::ImageEdit];

    /// APIキーが必要なモードか
    pub fn requires_credential(&self) -> bool {
        !matches!(self, AppMode::Midjourney)
    }

    /// リモート画像呼び出しで画像を得るモードか
    pub fn produces_image(&self) -> bool {
        !matches!(self, AppMode::Midjourney)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Midjourney => "midjourney",
            AppMode::NanoBanana => "nano_banana",
            AppMode::ImageEdit => "image_edit",
        }
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "midjourney" | "mj" => Ok(AppMode::Midjourney),
            "nano_banana" | "nano-banana" | "generate" => Ok(AppMode::NanoBanana),
            "image_edit" | "image-edit" | "edit" => Ok(AppMode::ImageEdit),
            _ => Err(format!(
                "Unknown mode: {}. Use midjourney, nano_banana, or image_edit",
                s
            )),
        }
    }
}

/// ポスターレイアウト（構図テンプレート）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutType {
    /// 中央に1品
    #[default]
    #[serde(rename = "layout_1")]
    Layout1,
    /// 右側に1品
    #[serde(rename = "layout_2")]
    Layout2,
    /// 左右対称に2品
    #[serde(rename = "layout_3")]
    Layout3,
    /// 6品のマトリクス
    #[serde(rename = "layout_4")]
    Layout4,
}

impl LayoutType {
    pub const ALL: [LayoutType; 4] = [
        LayoutType::Layout1,
        LayoutType::Layout2,
        LayoutType::Layout3,
        LayoutType::Layout4,
    ];

    /// このレイアウトが必要とする料理スロット数
    pub fn slot_count(&self) -> usize {
        match self {
            LayoutType::Layout1 | LayoutType::Layout2 => 1,
            LayoutType::Layout3 => 2,
            LayoutType::Layout4 => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Layout1 => "layout_1",
            LayoutType::Layout2 => "layout_2",
            LayoutType::Layout3 => "layout_3",
            LayoutType::Layout4 => "layout_4",
        }
    }
}

impl std::fmt::Display for LayoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "layout_1" | "layout1" | "1" => Ok(LayoutType::Layout1),
            "layout_2" | "layout2" | "2" => Ok(LayoutType::Layout2),
            "layout_3" | "layout3" | "3" => Ok(LayoutType::Layout3),
            "layout_4" | "layout4" | "4" => Ok(LayoutType::Layout4),
            _ => Err(format!("Unknown layout: {}. Use layout_1 .. layout_4", s)),
        }
    }
}

/// 料理1品分の入力
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishInput {
    pub id: String,

    #[serde(default)]
    pub name: String,             // 料理名（中国語・英語どちらも可）

    #[serde(default)]
    pub keywords: String,         // spicy, crispy など

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,      // 料理ジャンル

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,   // ポスター用キャッチコピー

    /// 翻訳済みの英語説明（翻訳前は None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_prompt: Option<String>,
}

impl DishInput {
    /// 空のスロットを新しいIDで作成
    pub fn empty() -> Self {
        Self {
            id: crate::new_id(),
            ..Default::default()
        }
    }

    pub fn new(name: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            keywords: keywords.into(),
            ..Default::default()
        }
    }
}

/// 料理入力の部分更新
///
/// サジェスト結果の適用に使う。`Some` かつ空でないフィールドだけが上書きされる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DishPatch {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub keywords: Option<String>,
    pub slogan: Option<String>,
}

/// スタイルカタログのエントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt_segment: &'static str,
}

/// 生成結果のステータス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Success => write!(f, "success"),
            ItemStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 1回の生成リクエストの記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub id: String,
    /// 作成時刻（UNIXミリ秒）
    pub timestamp: i64,
    pub mode: AppMode,
    pub layout: LayoutType,
    pub style_name: String,
    pub full_prompt: String,
    /// 生成画像のData URL（status == Success の画像モードのみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub dishes: Vec<DishInput>,
    pub status: ItemStatus,
}

/// 出力解像度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// 1K
    Standard,
    /// 2K
    #[default]
    Hd,
}

impl Resolution {
    /// Gemini imageConfig.imageSize の値
    pub fn image_size(&self) -> &'static str {
        match self {
            Resolution::Standard => "1K",
            Resolution::Hd => "2K",
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "1k" => Ok(Resolution::Standard),
            "hd" | "2k" => Ok(Resolution::Hd),
            _ => Err(format!("Unknown resolution: {}. Use standard or hd", s)),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Standard => write!(f, "standard"),
            Resolution::Hd => write!(f, "hd"),
        }
    }
}

/// 生成設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub resolution: Resolution,
    /// バリエーション数（1/2/4）。現状は常に1枚だけ要求する
    pub variations: u8,
    pub negative_safety: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd,
            variations: 1,
            negative_safety: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_counts() {
        let counts: Vec<usize> = LayoutType::ALL.iter().map(|l| l.slot_count()).collect();
        assert_eq!(counts, vec![1, 1, 2, 6]);
    }

    #[test]
    fn test_layout_serde_names() {
        let json = serde_json::to_string(&LayoutType::Layout3).unwrap();
        assert_eq!(json, "\"layout_3\"");
        let parsed: LayoutType = serde_json::from_str("\"layout_4\"").unwrap();
        assert_eq!(parsed, LayoutType::Layout4);
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_string(&AppMode::NanoBanana).unwrap(), "\"nano_banana\"");
        assert_eq!(serde_json::to_string(&AppMode::ImageEdit).unwrap(), "\"image_edit\"");
    }

    #[test]
    fn test_mode_credential_requirement() {
        assert!(!AppMode::Midjourney.requires_credential());
        assert!(AppMode::NanoBanana.requires_credential());
        assert!(AppMode::ImageEdit.requires_credential());
    }

    #[test]
    fn test_generated_item_camel_case() {
        let item = GeneratedItem {
            id: "abc".into(),
            timestamp: 1,
            mode: AppMode::Midjourney,
            layout: LayoutType::Layout1,
            style_name: "Custom".into(),
            full_prompt: "p".into(),
            image_url: None,
            dishes: vec![],
            status: ItemStatus::Success,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"fullPrompt\":\"p\""));
        assert!(json.contains("\"styleName\""));
        assert!(json.contains("\"status\":\"success\""));
        assert!(!json.contains("imageUrl"));
    }

    #[test]
    fn test_resolution_image_size() {
        assert_eq!(Resolution::Standard.image_size(), "1K");
        assert_eq!(Resolution::Hd.image_size(), "2K");
        assert_eq!("HD".parse::<Resolution>().unwrap(), Resolution::Hd);
    }

    #[test]
    fn test_dish_input_deserialize_minimal() {
        let dish: DishInput = serde_json::from_str(r#"{"id":"1","name":"宫保鸡丁"}"#).unwrap();
        assert_eq!(dish.name, "宫保鸡丁");
        assert_eq!(dish.keywords, "");
        assert!(dish.translated_prompt.is_none());
    }
}
