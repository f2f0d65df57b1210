//! 料理スロットの調整と部分更新

use crate::types::{DishInput, DishPatch, LayoutType};

/// レイアウトに合わせて料理リストの長さを調整
///
/// - 多ければ末尾から切り詰める
/// - 少なければ空のスロットを末尾に追加する
/// - 既存の内容は位置ごとに保持される
pub fn resize_for_layout(dishes: &mut Vec<DishInput>, layout: LayoutType) {
    let required = layout.slot_count();
    if dishes.len() > required {
        dishes.truncate(required);
    }
    while dishes.len() < required {
        dishes.push(DishInput::empty());
    }
}

fn merge_field(target: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        *target = v.to_string();
    }
}

fn merge_optional(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        *target = Some(v.to_string());
    }
}

impl DishInput {
    /// サジェスト結果を適用（存在するフィールドのみ上書き）
    pub fn apply_patch(&mut self, patch: &DishPatch) {
        merge_field(&mut self.name, &patch.name);
        merge_optional(&mut self.tag, &patch.tag);
        merge_field(&mut self.keywords, &patch.keywords);
        merge_optional(&mut self.slogan, &patch.slogan);
    }
}
