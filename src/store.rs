//! 生成結果ストア
//!
//! メモリ上の結果リスト（新しい順）を正とし、変更のたびに全体を
//! JSONにして固定キーでBlobStoreへ書き出す。書き出しはベストエフォートで、
//! 失敗しても呼び出し元には返さず「劣化」状態として記録する。

use crate::error::{PosterAiError, Result};
use poster_ai_common::GeneratedItem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// 結果履歴の保存キー
pub const RESULTS_KEY: &str = "hefenglou_results";

/// キー/値のBlob保存先
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn check_quota(size: usize, quota: Option<u64>) -> Result<()> {
    match quota {
        Some(quota) if size as u64 > quota => Err(PosterAiError::StorageQuotaExceeded {
            size: size as u64,
            quota,
        }),
        _ => Ok(()),
    }
}

/// ディレクトリ内に キー.json として保存
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>, quota: Option<u64>) -> Self {
        Self {
            dir: dir.into(),
            quota,
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        check_quota(value.len(), self.quota)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// メモリ上のBlobStore
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    data: Mutex<HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Default::default()
        }
    }

    /// 保存済みの値を直接書き込む（読み込み経路の確認用）
    pub fn with_value(self, key: &str, value: &str) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().ok().and_then(|d| d.get(key).cloned())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        check_quota(value.len(), self.quota)?;
        let mut data = self
            .data
            .lock()
            .map_err(|_| PosterAiError::Config("ストアのロックに失敗".into()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 永続化の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersistStatus {
    #[default]
    Ok,
    /// 直近の書き出しに失敗
    Degraded { reason: String },
}

pub struct ResultStore {
    items: Mutex<Vec<GeneratedItem>>,
    backend: Arc<dyn BlobStore>,
    status: Mutex<PersistStatus>,
    degraded_writes: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ResultStore {
    /// 起動時に一度だけ読み込む（壊れている・存在しない場合は空）
    pub fn load(backend: Arc<dyn BlobStore>) -> Self {
        let items = match backend.get(RESULTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GeneratedItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "履歴の読み込みに失敗、空で開始します");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "履歴ストアを読めません、空で開始します");
                Vec::new()
            }
        };
        tracing::debug!(count = items.len(), "結果履歴を読み込み");

        Self {
            items: Mutex::new(items),
            backend,
            status: Mutex::new(PersistStatus::Ok),
            degraded_writes: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Vec<GeneratedItem> {
        lock(&self.items).clone()
    }

    pub fn get(&self, id: &str) -> Option<GeneratedItem> {
        lock(&self.items).iter().find(|i| i.id == id).cloned()
    }

    /// IDの前方一致で1件に絞り込む
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let items = lock(&self.items);
        if let Some(exact) = items.iter().find(|i| i.id == prefix) {
            return Ok(exact.id.clone());
        }
        let matches: Vec<&GeneratedItem> = items
            .iter()
            .filter(|i| !prefix.is_empty() && i.id.starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(PosterAiError::ItemNotFound(prefix.to_string())),
            _ => Err(PosterAiError::Validation(format!(
                "IDが曖昧です: {} ({}件一致)",
                prefix,
                matches.len()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }

    /// 先頭に追加
    pub fn prepend(&self, item: GeneratedItem) {
        self.mutate(|items| items.insert(0, item));
    }

    /// IDで探して更新（見つからなければ何もしない）
    ///
    /// 削除済みの結果への遅延更新はここで捨てられる。
    pub fn update(&self, id: &str, f: impl FnOnce(&mut GeneratedItem)) -> Option<GeneratedItem> {
        self.mutate(|items| {
            items.iter_mut().find(|i| i.id == id).map(|item| {
                f(item);
                item.clone()
            })
        })
    }

    pub fn remove(&self, id: &str) -> bool {
        self.mutate(|items| {
            let before = items.len();
            items.retain(|i| i.id != id);
            items.len() != before
        })
    }

    pub fn clear(&self) {
        self.mutate(|items| items.clear());
    }

    pub fn persist_status(&self) -> PersistStatus {
        lock(&self.status).clone()
    }

    /// 書き出しに失敗した回数
    pub fn degraded_writes(&self) -> usize {
        self.degraded_writes.load(Ordering::SeqCst)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<GeneratedItem>) -> R) -> R {
        let mut items = lock(&self.items);
        let result = f(&mut items);
        self.persist(&items);
        result
    }

    fn persist(&self, items: &[GeneratedItem]) {
        let outcome = serde_json::to_string(items)
            .map_err(PosterAiError::from)
            .and_then(|json| self.backend.set(RESULTS_KEY, &json));

        let mut status = lock(&self.status);
        match outcome {
            Ok(()) => *status = PersistStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "履歴を保存できません（容量超過など）、メモリ上のみ保持します");
                self.degraded_writes.fetch_add(1, Ordering::SeqCst);
                *status = PersistStatus::Degraded {
                    reason: e.to_string(),
                };
            }
        }
    }
}
