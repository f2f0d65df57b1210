//! APIレスポンスパーサー
//!
//! Gemini応答テキストからJSONを抽出してサジェスト結果をパースする。
//! Data URL（"data:image/png;base64,..."）の分解・組み立てもここで行う。

use crate::error::{Error, Result};
use crate::types::DishPatch;

/// APIレスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use poster_ai_common::extract_json_object;
///
/// let response = "{\"name\": \"鱼\"}";
/// let json = extract_json_object(response).unwrap();
/// assert!(json.contains("name"));
/// ```
pub fn extract_json_object(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONオブジェクトが見つかりません".into()))
}

/// サジェスト応答をパース
///
/// スキーマ指定で返ってきた `{name, tag, keywords, slogan}` を部分更新に変換する。
/// 欠けたフィールドは None のまま。
pub fn parse_suggestion_response(response: &str) -> Result<DishPatch> {
    let json_str = extract_json_object(response)?;
    let patch: DishPatch = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("サジェストJSONパースエラー: {}", e)))?;
    Ok(patch)
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data)
}

/// Data URLからMIMEタイプを抽出（取れなければ image/png）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty() && !mime.contains(','))
        .unwrap_or("image/png")
}

/// MIMEタイプとBase64データからData URLを組み立て
pub fn to_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}
