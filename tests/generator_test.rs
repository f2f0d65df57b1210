//! 翻訳・サジェストのテスト
//!
//! どちらもリモート失敗で呼び出し元を止めないことを検証

mod common;

use common::{FakeService, Harness};
use poster_ai_common::{DishInput, DishPatch};
use poster_ai_rust::error::PosterAiError;
use poster_ai_rust::generator::{fallback_suggestion, SuggestionSource};
use std::sync::atomic::Ordering;

fn dish_marker(prompt: &str) -> String {
    ["宫保鸡丁", "北京烤鸭", "小笼包"]
        .iter()
        .find(|name| prompt.contains(*name))
        .map(|name| format!("english for {}", name))
        .unwrap_or_default()
}

/// キー未設定ならリモートを呼ばずにフォールバック
#[tokio::test]
async fn test_translate_without_key_skips_remote() {
    let harness = Harness::new(FakeService::default(), None);

    let text = harness.generator().translate("宫保鸡丁", "spicy").await;

    assert_eq!(text, "宫保鸡丁 spicy");
    assert_eq!(harness.service.remote_calls(), 0);
}

/// リモート失敗・空応答もフォールバック
#[tokio::test]
async fn test_translate_failure_falls_back() {
    let service =
        FakeService::default().with_text(|_| Err(PosterAiError::ApiCall("timeout".into())));
    let harness = Harness::new(service, Some("key"));
    assert_eq!(
        harness.generator().translate("小笼包", "juicy").await,
        "小笼包 juicy"
    );

    let service = FakeService::default().with_text(|_| Ok("  \n".into()));
    let harness = Harness::new(service, Some("key"));
    assert_eq!(
        harness.generator().translate("小笼包", "juicy").await,
        "小笼包 juicy"
    );
}

/// 応答は前後の空白を除いて使う
#[tokio::test]
async fn test_translate_trims_response() {
    let service = FakeService::default().with_text(|_| Ok("  Juicy soup dumplings\n".into()));
    let harness = Harness::new(service, Some("key"));

    assert_eq!(
        harness.generator().translate("小笼包", "").await,
        "Juicy soup dumplings"
    );
}

/// 並行翻訳でも入力順が保たれる
#[tokio::test]
async fn test_translate_dishes_preserves_order() {
    let service = FakeService::default().with_text(|prompt| Ok(dish_marker(prompt)));
    let harness = Harness::new(service, Some("key"));
    let dishes = vec![
        DishInput::new("北京烤鸭", "crispy"),
        DishInput::new("宫保鸡丁", "spicy"),
        DishInput::new("小笼包", "juicy"),
    ];

    let translated = harness.generator().translate_dishes(&dishes).await;

    let texts: Vec<&str> = translated
        .iter()
        .map(|d| d.translated_prompt.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(
        texts,
        vec![
            "english for 北京烤鸭",
            "english for 宫保鸡丁",
            "english for 小笼包"
        ]
    );
    // ID・入力値はそのまま
    for (before, after) in dishes.iter().zip(&translated) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.name, after.name);
    }
}

/// 一部だけ失敗してもその料理だけがフォールバックになる
#[tokio::test]
async fn test_translate_dishes_partial_failure() {
    let service = FakeService::default().with_text(|prompt| {
        if prompt.contains("宫保鸡丁") {
            Err(PosterAiError::ApiCall("API error: 500: boom".into()))
        } else {
            Ok(dish_marker(prompt))
        }
    });
    let harness = Harness::new(service, Some("key"));
    let dishes = vec![
        DishInput::new("宫保鸡丁", "spicy"),
        DishInput::new("小笼包", "juicy"),
    ];

    let translated = harness.generator().translate_dishes(&dishes).await;

    assert_eq!(translated[0].translated_prompt.as_deref(), Some("宫保鸡丁 spicy"));
    assert_eq!(
        translated[1].translated_prompt.as_deref(),
        Some("english for 小笼包")
    );
}

/// 空のスロットは翻訳しない
#[tokio::test]
async fn test_translate_dishes_skips_empty_slots() {
    let harness = Harness::new(FakeService::default(), Some("key"));
    let dishes = vec![DishInput::empty(), DishInput::new("小笼包", "")];

    let translated = harness.generator().translate_dishes(&dishes).await;

    assert!(translated[0].translated_prompt.is_none());
    assert!(translated[1].translated_prompt.is_some());
    assert_eq!(harness.service.text_calls.load(Ordering::SeqCst), 1);
}

/// モデル応答のサジェスト
#[tokio::test]
async fn test_suggest_from_model() {
    let harness = Harness::new(FakeService::default(), Some("key"));

    let suggestion = harness.generator().suggest("宫保").await.unwrap();

    assert_eq!(suggestion.source, SuggestionSource::Model);
    assert_eq!(suggestion.patch.name.as_deref(), Some("Kung Pao"));
    assert_eq!(suggestion.patch.slogan.as_deref(), Some("香辣过瘾"));
}

/// コードブロックで囲まれた応答も読める
#[tokio::test]
async fn test_suggest_fenced_response() {
    let service = FakeService::default().with_json(|_| {
        Ok("```json\n{\"name\":\"Dim Sum\",\"tag\":\"Classic\",\"keywords\":\"steamed\",\"slogan\":\"一口鲜\"}\n```".into())
    });
    let harness = Harness::new(service, Some("key"));

    let suggestion = harness.generator().suggest("").await.unwrap();

    assert_eq!(suggestion.source, SuggestionSource::Model);
    assert_eq!(suggestion.patch.tag.as_deref(), Some("Classic"));
}

/// 失敗時は定型文で、出どころが区別できる
#[tokio::test]
async fn test_suggest_failure_is_fallback() {
    let service = FakeService::default().with_json(|_| Ok("not json at all".into()));
    let harness = Harness::new(service, Some("key"));

    let suggestion = harness.generator().suggest("鱼香肉丝").await.unwrap();

    assert_eq!(suggestion.source, SuggestionSource::Fallback);
    assert_eq!(suggestion.patch, fallback_suggestion("鱼香肉丝"));
    assert_eq!(suggestion.patch.name.as_deref(), Some("鱼香肉丝"));
}

/// キー未設定のみエラーになる
#[tokio::test]
async fn test_suggest_without_key_errors() {
    let harness = Harness::new(FakeService::default(), None);

    let result = harness.generator().suggest("鱼香肉丝").await;

    assert!(matches!(result, Err(PosterAiError::MissingApiKey)));
    assert_eq!(harness.service.remote_calls(), 0);
}

/// サジェストの適用は空でない項目だけを上書き
#[tokio::test]
async fn test_apply_suggestion_to_dish() {
    let harness = Harness::new(FakeService::default(), Some("key"));
    let mut dish = DishInput::new("宫保", "old keywords");
    dish.slogan = Some("旧标语".into());
    let id = dish.id.clone();

    let suggestion = harness.generator().suggest(&dish.name).await.unwrap();
    let patch = DishPatch {
        slogan: Some(String::new()),
        ..suggestion.patch
    };
    dish.apply_patch(&patch);

    assert_eq!(dish.id, id);
    assert_eq!(dish.name, "Kung Pao");
    assert_eq!(dish.keywords, "peanut, chili");
    assert_eq!(dish.slogan.as_deref(), Some("旧标语"));
}
