//! テスト用の差し替え部品
#![allow(dead_code)]

use async_trait::async_trait;
use poster_ai_rust::config::Config;
use poster_ai_rust::credentials::{Credentials, StaticKeySource};
use poster_ai_rust::error::{PosterAiError, Result};
use poster_ai_rust::gemini::{GenerativeService, ImageConfig, InlineData, Part, ResponsePart};
use poster_ai_rust::generator::{Generator, Models};
use poster_ai_rust::orchestrator::Orchestrator;
use poster_ai_rust::store::{MemoryBlobStore, ResultStore};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// 1x1 PNG
pub const PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", PNG_BASE64)
}

type TextHandler = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;
type ContentHandler = Box<dyn Fn(&[Part]) -> Result<Vec<ResponsePart>> + Send + Sync>;

/// 呼び出しを記録するリモートサービスの代役
pub struct FakeService {
    text: TextHandler,
    json: TextHandler,
    content: ContentHandler,
    pub text_calls: AtomicUsize,
    pub json_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
    pub image_configs: Mutex<Vec<ImageConfig>>,
    pub content_parts: Mutex<Vec<Vec<Part>>>,
    /// generate_content の開始を知らせる
    pub started: Arc<Notify>,
    /// セットされていれば generate_content はこれを待ってから返す
    gate: Option<Arc<Notify>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            text: Box::new(|prompt| Ok(format!("EN({})", prompt.len()))),
            json: Box::new(|_| {
                Ok(r#"{"name":"Kung Pao","tag":"Spicy","keywords":"peanut, chili","slogan":"香辣过瘾"}"#.into())
            }),
            content: Box::new(|_| Ok(vec![image_part()])),
            text_calls: AtomicUsize::new(0),
            json_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
            image_configs: Mutex::new(Vec::new()),
            content_parts: Mutex::new(Vec::new()),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }
}

impl FakeService {
    pub fn with_text(mut self, f: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        self.text = Box::new(f);
        self
    }

    pub fn with_json(mut self, f: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        self.json = Box::new(f);
        self
    }

    pub fn with_content(
        mut self,
        f: impl Fn(&[Part]) -> Result<Vec<ResponsePart>> + Send + Sync + 'static,
    ) -> Self {
        self.content = Box::new(f);
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn remote_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
            + self.json_calls.load(Ordering::SeqCst)
            + self.content_calls.load(Ordering::SeqCst)
    }
}

pub fn image_part() -> ResponsePart {
    ResponsePart {
        text: None,
        inline_data: Some(InlineData {
            mime_type: "image/png".into(),
            data: PNG_BASE64.into(),
        }),
    }
}

pub fn permission_denied() -> PosterAiError {
    PosterAiError::ApiCall(
        r#"API error: 403 Forbidden: {"error":{"status":"PERMISSION_DENIED"}}"#.into(),
    )
}

#[async_trait]
impl GenerativeService for FakeService {
    async fn generate_text(&self, _api_key: &str, _model: &str, prompt: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        (self.text)(prompt)
    }

    async fn generate_json(
        &self,
        _api_key: &str,
        _model: &str,
        prompt: &str,
        _schema: &Value,
    ) -> Result<String> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        (self.json)(prompt)
    }

    async fn generate_content(
        &self,
        _api_key: &str,
        _model: &str,
        parts: Vec<Part>,
        image_config: ImageConfig,
    ) -> Result<Vec<ResponsePart>> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.image_configs.lock().unwrap().push(image_config);
        self.content_parts.lock().unwrap().push(parts.clone());
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        (self.content)(&parts)
    }
}

/// テスト用の一式
pub struct Harness {
    pub service: Arc<FakeService>,
    pub backend: Arc<MemoryBlobStore>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new(service: FakeService, key: Option<&str>) -> Self {
        Self::with_source(service, StaticKeySource::new(key.map(str::to_string)))
    }

    pub fn with_source(service: FakeService, source: StaticKeySource) -> Self {
        let service = Arc::new(service);
        let backend = Arc::new(MemoryBlobStore::new());
        let credentials = Arc::new(Credentials::detect(Arc::new(source)));
        let generator = Generator::new(
            service.clone(),
            credentials,
            Models::from(&Config::default()),
        );
        let store = Arc::new(ResultStore::load(backend.clone()));
        Self {
            service,
            backend,
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
