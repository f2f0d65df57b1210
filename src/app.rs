//! 設定から各コンポーネントを組み立てる

use crate::config::Config;
use crate::credentials::{ConfigKeySource, Credentials, KeySource};
use crate::error::Result;
use crate::gemini::{GeminiClient, GenerativeService};
use crate::generator::{Generator, Models};
use crate::orchestrator::Orchestrator;
use crate::store::{BlobStore, FileBlobStore, ResultStore};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub orchestrator: Orchestrator,
}

impl App {
    /// 設定ファイル・環境変数・データディレクトリを使う本番構成
    pub fn from_config(config: Config) -> Result<Self> {
        let backend = FileBlobStore::new(config.data_dir()?, config.storage_quota_bytes);
        tracing::debug!(dir = %backend.dir().display(), "履歴ストア");
        Ok(Self::with_parts(
            config.clone(),
            Arc::new(ConfigKeySource::new(config)),
            Arc::new(GeminiClient::new()),
            Arc::new(backend),
        ))
    }

    /// 差し替え可能な部品から組み立てる
    pub fn with_parts(
        config: Config,
        keys: Arc<dyn KeySource>,
        service: Arc<dyn GenerativeService>,
        backend: Arc<dyn BlobStore>,
    ) -> Self {
        let credentials = Arc::new(Credentials::detect(keys));
        let generator = Generator::new(service, credentials, Models::from(&config));
        let store = Arc::new(ResultStore::load(backend));
        Self {
            config,
            orchestrator: Orchestrator::new(generator, store),
        }
    }

    pub fn generator(&self) -> &Generator {
        self.orchestrator.generator()
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        self.orchestrator.store()
    }
}
