#![allow(dead_code)]


use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::net::TcpListener;

use facescan_backend::api::routes;
use facescan_backend::models::scan::{MatchDecision, WebhookRecord};
use facescan_backend::notify::NotificationSink;
use facescan_backend::store::FaceStore;
use facescan_backend::utils::config::{Config, MatchPolicy};
use facescan_backend::verify::Verifier;
use facescan_backend::AppState;

/// Deterministic verifier: answers from a script, then falls back to a default.
pub struct StubVerifier {
    script: Mutex<VecDeque<Result<bool, String>>>,
    fallback: Result<bool, String>,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub fn always(verified: bool) -> Self {
        Self::scripted(Vec::new(), Ok(verified))
    }

    pub fn failing(message: &str) -> Self {
        Self::scripted(Vec::new(), Err(message.to_string()))
    }

    pub fn scripted(answers: Vec<Result<bool, String>>, fallback: Result<bool, String>) -> Self {
        Self { script: Mutex::new(answers.into()), fallback, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Verifier for StubVerifier {
    async fn compare(&self, probe: &Path, reference: &Path) -> anyhow::Result<MatchDecision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(probe.is_file(), "probe must be staged on disk during comparison");
        assert!(reference.is_file(), "reference must exist");
        let answer = self.script.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback.clone());
        answer.map(MatchDecision::verified).map_err(|e| anyhow::anyhow!(e))
    }
}

/// In-memory notification sink that records every webhook record.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<WebhookRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<WebhookRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, record: &WebhookRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

pub fn test_config(root: &Path, policy: MatchPolicy) -> Config {
    Config {
        storage_root: root.to_path_buf(),
        host: "127.0.0.1".to_string(),
        port: 0,
        webhook_url: "http://127.0.0.1:9/scan-faces".to_string(),
        webhook_timeout_secs: 2,
        verify_url: "http://127.0.0.1:9/verify".to_string(),
        verify_model: "Facenet".to_string(),
        verify_timeout_secs: 2,
        max_references: 3,
        match_policy: policy,
        max_upload_bytes: 8 * 1024 * 1024,
    }
}

/// A running service instance over a throwaway storage root.
pub struct TestApp {
    pub _tmp: TempDir,
    pub root: PathBuf,
    pub store: FaceStore,
    pub verifier: Arc<StubVerifier>,
    pub sink: Arc<MemorySink>,
    pub client: TestClient,
}

impl TestApp {
    pub async fn spawn(verifier: StubVerifier) -> Self {
        Self::spawn_with_policy(verifier, MatchPolicy::FirstDecisive).await
    }

    pub async fn spawn_with_policy(verifier: StubVerifier, policy: MatchPolicy) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("storage");
        Self::start(tmp, root, verifier, |cfg| cfg.match_policy = policy).await
    }

    /// Storage root given relative to the working directory.
    pub async fn spawn_relative(verifier: StubVerifier) -> Self {
        let tmp = tempfile::Builder::new().prefix("facescan-rel").tempdir_in(".").unwrap();
        let root = Path::new(".").join(tmp.path().file_name().unwrap()).join("storage");
        Self::start(tmp, root, verifier, |_| {}).await
    }

    pub async fn spawn_with_upload_limit(verifier: StubVerifier, max_upload_bytes: usize) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("storage");
        Self::start(tmp, root, verifier, |cfg| cfg.max_upload_bytes = max_upload_bytes).await
    }

    async fn start(tmp: TempDir, root: PathBuf, verifier: StubVerifier, adjust: impl FnOnce(&mut Config)) -> Self {
        let mut cfg = test_config(&root, MatchPolicy::FirstDecisive);
        adjust(&mut cfg);
        let store = FaceStore::open(&cfg.storage_root).unwrap();
        let verifier = Arc::new(verifier);
        let sink = Arc::new(MemorySink::default());
        let state = Arc::new(AppState::new(&cfg, store.clone(), verifier.clone(), sink.clone()));
        let port = serve(routes::router(state)).await;
        Self { _tmp: tmp, root, store, verifier, sink, client: TestClient::new(port) }
    }

    pub fn user_dir(&self, name: &str) -> PathBuf {
        self.store.user_dir(name)
    }

    /// Seed `count` reference images for `name` directly on disk.
    pub fn seed_references(&self, name: &str, count: usize) {
        let dir = self.user_dir(name);
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            std::fs::write(dir.join(format!("{}_2024010{}_120000.jpg", name, i)), fixtures::jpeg_bytes()).unwrap();
        }
    }

    pub fn result_files(&self) -> Vec<String> {
        list_names(self.store.results_dir())
    }

    pub fn pending_uploads(&self) -> Vec<String> {
        list_names(self.store.upload_dir())
    }
}

pub fn list_names(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}

/// Serve `app` on an ephemeral localhost port and return the port.
pub async fn serve(app: axum::Router) -> u16 {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = TcpListener::bind(&addr).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

/// Helper to make HTTP requests to test server
pub struct TestClient {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestClient {
    pub fn new(port: u16) -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(&format!("{}{}", self.base_url, path)).send().await
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .multipart(form)
            .send()
            .await
    }
}

pub fn file_part(filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str("image/jpeg")
        .unwrap()
}

pub fn register_form(name: Option<&str>, file: Option<(&str, Vec<u8>)>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    if let Some(name) = name {
        form = form.text("name", name.to_string());
    }
    if let Some((filename, bytes)) = file {
        form = form.part("file", file_part(filename, bytes));
    }
    form
}

pub fn recognize_form(username: &str, filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("username", username.to_string())
        .text("id", "42")
        .text("panel", "P-07")
        .text("kpm", "KPM-3")
        .part("file", file_part(filename, bytes))
}
