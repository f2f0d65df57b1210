//! Poster AI Common Library
//!
//! CLIと将来のWeb(WASM)フロントで共有される型とユーティリティ。
//! I/Oを持たない純粋なロジックのみを置く。

pub mod types;
pub mod catalog;
pub mod prompts;
pub mod dishes;
pub mod aspect;
pub mod error;
pub mod parser;

pub use types::{
    AppMode, DishInput, DishPatch, GeneratedItem, GenerationConfig, ItemStatus, LayoutType,
    Resolution, StyleOption,
};
pub use catalog::{find_style, StyleSelection, STYLE_OPTIONS};
pub use prompts::{
    build_prompt, build_suggestion_prompt, build_translation_prompt, suggestion_schema,
};
pub use dishes::resize_for_layout;
pub use aspect::{closest_aspect_ratio, closest_to_ratio, AspectRatio};
pub use error::{Error, Result};
pub use parser::{
    extract_base64_from_data_url, extract_json_object, extract_mime_type_from_data_url,
    parse_suggestion_response, to_data_url,
};

/// 新しい不透明ID
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
