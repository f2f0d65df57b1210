//! 生成オーケストレーター
//!
//! 1回の操作ごとに 翻訳 → プロンプト生成 → 結果レコード作成 → 画像生成/編集 →
//! ステータス確定 を順に実行する。
//!
//! 結果ごとの状態遷移: pending → success | failed
//! 再生成は保存済みプロンプトをそのまま使い、画像を消して pending に戻す。

use crate::error::{PosterAiError, Result};
use crate::generator::{Generator, Suggestion};
use crate::store::ResultStore;
use poster_ai_common::catalog::IMAGE_EDIT_STYLE_NAME;
use poster_ai_common::{
    build_prompt, new_id, resize_for_layout, AppMode, AspectRatio, DishInput, GeneratedItem,
    GenerationConfig, ItemStatus, LayoutType, StyleSelection,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// ユーザーに出す警告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// 権限エラー。有効なAPIキーの再選択が必要
    PermissionDenied,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::PermissionDenied => write!(
                f,
                "Permission denied. Please select a valid API Key with access to the model."
            ),
        }
    }
}

/// 生成リクエスト（画面の入力状態に相当）
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub mode: AppMode,
    pub layout: LayoutType,
    pub style: StyleSelection,
    pub dishes: Vec<DishInput>,
    pub config: GenerationConfig,
    /// 画像生成時のスタイル参照画像（Data URL）
    pub reference_image: Option<String>,
    /// 編集元画像（Data URL）
    pub source_image: Option<String>,
    pub source_ratio: AspectRatio,
    pub edit_instruction: String,
}

/// 再生成時に使う現在の入力
#[derive(Debug, Clone, Default)]
pub struct RegenerateOptions {
    pub config: GenerationConfig,
    pub reference_image: Option<String>,
    pub source_image: Option<String>,
    pub source_ratio: AspectRatio,
}

/// 確定した生成結果
#[derive(Debug, Clone)]
pub struct Settlement {
    pub item_id: String,
    /// 確定後のレコード（途中で削除されていれば None）
    pub item: Option<GeneratedItem>,
    /// 翻訳済みの料理入力（入力状態への書き戻し用）
    pub dishes: Vec<DishInput>,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// キー未設定のためキー選択に切り替えた（結果は作らない）
    CredentialRequested { selected: bool },
    Settled(Settlement),
}

#[derive(Debug, Clone)]
pub enum SuggestOutcome {
    /// キー未設定のためキー選択に切り替えた
    CredentialRequested { selected: bool },
    Suggested(Suggestion),
}

/// 生成中フラグのガード
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct Orchestrator {
    generator: Generator,
    store: Arc<ResultStore>,
    generating: AtomicBool,
}

impl Orchestrator {
    pub fn new(generator: Generator, store: Arc<ResultStore>) -> Self {
        Self {
            generator,
            store,
            generating: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// 生成中か（再生成は含まない）
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// 生成を開始して結果確定まで待つ
    pub async fn submit(&self, request: &SubmitRequest) -> Result<SubmitOutcome> {
        if request.mode.requires_credential() && !self.generator.credentials().has_key() {
            return Ok(self.request_credential());
        }

        let _busy = BusyGuard::acquire(&self.generating)
            .ok_or_else(|| PosterAiError::Validation("生成中です".into()))?;

        let settlement = match request.mode {
            AppMode::ImageEdit => self.submit_edit(request).await?,
            AppMode::Midjourney | AppMode::NanoBanana => self.submit_prompt(request).await,
        };
        Ok(SubmitOutcome::Settled(settlement))
    }

    /// 保存済みプロンプトで再生成
    ///
    /// 翻訳・プロンプト生成はやり直さない。プロンプトのみのモードでは何もしない。
    pub async fn regenerate(&self, id: &str, options: &RegenerateOptions) -> Result<SubmitOutcome> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| PosterAiError::ItemNotFound(id.to_string()))?;

        if item.mode.requires_credential() && !self.generator.credentials().has_key() {
            return Ok(self.request_credential());
        }

        if !item.mode.produces_image() {
            tracing::info!(id, "プロンプトのみの結果は再生成不要");
            return Ok(SubmitOutcome::Settled(Settlement {
                item_id: item.id.clone(),
                dishes: item.dishes.clone(),
                item: Some(item),
                alert: None,
            }));
        }

        let source_image = match item.mode {
            AppMode::ImageEdit => Some(options.source_image.as_deref().ok_or_else(|| {
                PosterAiError::Validation("編集結果の再生成には元画像が必要です".into())
            })?),
            _ => None,
        };

        self.store.update(id, |i| {
            i.status = ItemStatus::Pending;
            i.image_url = None;
        });
        tracing::info!(id, mode = %item.mode, "再生成開始");

        let result = match source_image {
            Some(source) => {
                self.generator
                    .edit_image(source, &item.full_prompt, options.source_ratio)
                    .await
            }
            None => {
                self.generator
                    .generate_image(
                        &item.full_prompt,
                        options.config.resolution,
                        options.reference_image.as_deref(),
                    )
                    .await
            }
        };

        Ok(SubmitOutcome::Settled(self.settle(id, item.dishes, result)))
    }

    /// 料理プロフィールをサジェスト
    ///
    /// キー未設定なら生成と同じくキー選択に切り替える。
    pub async fn suggest(&self, partial_name: &str) -> Result<SuggestOutcome> {
        match self.generator.suggest(partial_name).await {
            Ok(suggestion) => Ok(SuggestOutcome::Suggested(suggestion)),
            Err(PosterAiError::MissingApiKey) => Ok(SuggestOutcome::CredentialRequested {
                selected: self.select_credential(),
            }),
            Err(e) => Err(e),
        }
    }

    /// 結果を削除（生成中でも削除する）
    pub fn delete(&self, id: &str) -> bool {
        self.store.remove(id)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    fn request_credential(&self) -> SubmitOutcome {
        SubmitOutcome::CredentialRequested {
            selected: self.select_credential(),
        }
    }

    fn select_credential(&self) -> bool {
        match self.generator.credentials().select() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "APIキー選択に失敗");
                false
            }
        }
    }

    async fn submit_edit(&self, request: &SubmitRequest) -> Result<Settlement> {
        let source_image = match request.source_image.as_deref() {
            Some(source) if !request.edit_instruction.trim().is_empty() => source,
            _ => {
                return Err(PosterAiError::Validation(
                    "Please upload an image and provide instructions.".into(),
                ))
            }
        };

        let item = GeneratedItem {
            id: new_id(),
            timestamp: now_millis(),
            mode: AppMode::ImageEdit,
            layout: LayoutType::Layout1,
            style_name: IMAGE_EDIT_STYLE_NAME.to_string(),
            full_prompt: request.edit_instruction.clone(),
            image_url: None,
            dishes: Vec::new(),
            status: ItemStatus::Pending,
        };
        let id = item.id.clone();
        self.store.prepend(item);
        tracing::info!(id = %id, ratio = %request.source_ratio, "画像編集開始");

        let result = self
            .generator
            .edit_image(source_image, &request.edit_instruction, request.source_ratio)
            .await;

        Ok(self.settle(&id, Vec::new(), result))
    }

    async fn submit_prompt(&self, request: &SubmitRequest) -> Settlement {
        // 料理数はレイアウトのスロット数に揃える
        let mut dishes = request.dishes.clone();
        resize_for_layout(&mut dishes, request.layout);
        let dishes = self.generator.translate_dishes(&dishes).await;
        let prompt = build_prompt(
            request.mode,
            request.layout,
            &request.style.prompt_text(),
            &dishes,
        );

        let produces_image = request.mode.produces_image();
        let item = GeneratedItem {
            id: new_id(),
            timestamp: now_millis(),
            mode: request.mode,
            layout: request.layout,
            style_name: request.style.display_name(),
            full_prompt: prompt.clone(),
            image_url: None,
            dishes: dishes.clone(),
            status: if produces_image {
                ItemStatus::Pending
            } else {
                ItemStatus::Success
            },
        };
        let id = item.id.clone();
        self.store.prepend(item);
        tracing::info!(id = %id, mode = %request.mode, layout = %request.layout, "結果を作成");

        if !produces_image {
            return Settlement {
                item: self.store.get(&id),
                item_id: id,
                dishes,
                alert: None,
            };
        }

        let result = self
            .generator
            .generate_image(
                &prompt,
                request.config.resolution,
                request.reference_image.as_deref(),
            )
            .await;

        self.settle(&id, dishes, result)
    }

    /// リモート呼び出しの結果でステータスを確定
    ///
    /// 結果が削除済みなら更新は捨てる。
    fn settle(
        &self,
        id: &str,
        dishes: Vec<DishInput>,
        result: Result<Option<String>>,
    ) -> Settlement {
        let mut alert = None;
        let (status, image_url) = match result {
            Ok(Some(url)) => (ItemStatus::Success, Some(url)),
            Ok(None) => {
                tracing::warn!(id, "応答に画像が含まれていません");
                (ItemStatus::Failed, None)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "生成に失敗");
                if e.is_permission_denied() {
                    self.generator.credentials().revoke();
                    alert = Some(Alert::PermissionDenied);
                }
                (ItemStatus::Failed, None)
            }
        };

        let item = self.store.update(id, |i| {
            i.status = status;
            i.image_url = image_url;
        });
        if item.is_none() {
            tracing::debug!(id, "結果は削除済み、更新を破棄");
        }

        Settlement {
            item_id: id.to_string(),
            item,
            dishes,
            alert,
        }
    }
}
