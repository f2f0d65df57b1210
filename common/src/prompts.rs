//! プロンプト生成モジュール
//!
//! CLIと将来のWeb(WASM)で共有されるプロンプト生成ロジック:
//! - build_prompt: ポスター用の最終プロンプト（純粋関数）
//! - build_translation_prompt: 料理名の英訳用プロンプト
//! - build_suggestion_prompt / suggestion_schema: 料理サジェスト用プロンプトとスキーマ

use crate::catalog::{BASE_PROMPT, NEGATIVE_CONSTRAINTS};
use crate::types::{AppMode, DishInput, LayoutType};
use serde_json::{json, Value};

/// 料理ごとの見た目強調フレーズ
pub const DISH_QUALIFIERS: &str =
    "appetizing texture, steam, glossy highlights, cinematic lighting, high detail";

/// スローガン未入力時のタグライン
pub const FALLBACK_TAGLINE: &str = "Fresh & Premium";

/// 価格バッジの固定文字列
pub const PLACEHOLDER_PRICE: &str = "¥88";

/// Midjourney用の末尾パラメータ
pub const MIDJOURNEY_SUFFIX: &str = " --ar 11:24";

/// 画像生成モード用の末尾フレーズ
pub const TYPOGRAPHIC_SUFFIX: &str = ", aspect ratio 11:24, high resolution, typographic poster";

/// 料理1品分の被写体フラグメント
///
/// 翻訳済み説明があればそれを使い、なければ `"{name}, {keywords}"`。
pub fn dish_fragment(index: usize, dish: &DishInput) -> String {
    let content = match dish.translated_prompt.as_deref() {
        Some(translated) if !translated.is_empty() => translated.to_string(),
        _ => format!("{}, {}", dish.name, dish.keywords),
    };
    format!("Dish {}: {}, {}", index + 1, content, DISH_QUALIFIERS)
}

/// 文字入れ指示ブロック（画像生成モード用）
fn text_rendering_block(dishes: &[DishInput]) -> String {
    let main_dish = dishes.first();
    let title = main_dish.map(|d| d.name.as_str()).unwrap_or_default();
    let tagline = main_dish
        .and_then(|d| d.slogan.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TAGLINE);

    format!(
        "\nIMPORTANT: Render the following text clearly and elegantly on the poster:\n\
1. Main Title (Top): \"{title}\" in a sophisticated calligraphy or serif font.\n\
2. Tagline (Bottom/Side): \"{tagline}\" in a smaller modern font.\n\
3. Price Tag: \"{PLACEHOLDER_PRICE}\" in a small badge.\n\
Ensure the text is legible, correctly spelled, and integrated into the composition."
    )
}

/// ポスター用プロンプトを組み立てる
///
/// 同じ入力には常に同じ文字列を返す。空の料理名・キーワードは
/// そのまま空文字として埋め込まれる。
///
/// # Arguments
/// * `mode` - 生成モード（Midjourneyは文字なし、それ以外は文字入り）
/// * `layout` - レイアウト
/// * `style_text` - スタイル文（プリセット or カスタム）
/// * `dishes` - 料理入力（順序どおりに埋め込まれる）
pub fn build_prompt(
    mode: AppMode,
    layout: LayoutType,
    style_text: &str,
    dishes: &[DishInput],
) -> String {
    let subjects = dishes
        .iter()
        .enumerate()
        .map(|(i, d)| dish_fragment(i, d))
        .collect::<Vec<_>>()
        .join("; ");

    let supplement = match mode {
        AppMode::Midjourney => NEGATIVE_CONSTRAINTS.to_string(),
        AppMode::NanoBanana | AppMode::ImageEdit => text_rendering_block(dishes),
    };

    let parts = [
        BASE_PROMPT.to_string(),
        layout.description().to_string(),
        format!("Style: {}", style_text),
        format!("Subjects: {}", subjects),
        supplement,
    ];

    let mut prompt = parts.join(", ");
    match mode {
        AppMode::Midjourney => prompt.push_str(MIDJOURNEY_SUFFIX),
        AppMode::NanoBanana | AppMode::ImageEdit => prompt.push_str(TYPOGRAPHIC_SUFFIX),
    }
    prompt
}

/// 料理名英訳プロンプト
pub fn build_translation_prompt(name: &str, keywords: &str) -> String {
    format!(
        r#"Translate this Chinese dish name to appetizing English for a food photography prompt.
Input: "{name}". Keywords: "{keywords}".
Output ONLY the English description with adjectives. No explanations."#
    )
}

/// 料理サジェストプロンプト
///
/// 料理名が空なら完全にお任せで1品考えさせ、
/// 入力があればそれを高級レストラン風に仕上げさせる。
pub fn build_suggestion_prompt(partial_name: &str) -> String {
    let trimmed = partial_name.trim();
    let input_context = if trimmed.is_empty() {
        "User Input: Empty. Suggest a completely random, popular, high-end Chinese banquet dish (e.g. Seafood, Steak, traditional delicacy).".to_string()
    } else {
        format!(
            "User Input: \"{}\". Enhance this into a specific, high-end restaurant dish name.",
            partial_name
        )
    };

    format!(
        r#"You are a creative director for a luxury Chinese restaurant (He Feng Lou).
{input_context}

Generate a complete profile including:
1. name: A fancy, appetizing Chinese dish name (e.g. 鲍汁扣辽参).
2. tag: The cuisine style (e.g. 粤菜).
3. keywords: 6-8 vivid English keywords for image generation (texture, lighting).
4. slogan: A short, poetic Chinese marketing slogan (4-8 chars).
"#
    )
}

/// サジェスト応答のJSONスキーマ（4フィールドすべて必須の文字列）
pub fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "The fancy Chinese dish name." },
            "tag": { "type": "STRING", "description": "Cuisine category or style." },
            "keywords": { "type": "STRING", "description": "Visual keywords in English." },
            "slogan": { "type": "STRING", "description": "Marketing slogan in Chinese." }
        },
        "required": ["name", "tag", "keywords", "slogan"]
    })
}
