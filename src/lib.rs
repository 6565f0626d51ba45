pub mod utils;
pub mod error;
pub mod models;
pub mod store;
pub mod verify;
pub mod notify;
pub mod service;
pub mod api;

use std::sync::Arc;

use crate::notify::NotificationSink;
use crate::store::FaceStore;
use crate::utils::config::{Config, MatchPolicy};
use crate::verify::Verifier;

#[derive(Clone)]
pub struct AppState {
    pub started_at: std::time::Instant,
    pub store: FaceStore,
    pub verifier: Arc<dyn Verifier>,
    pub notifier: Arc<dyn NotificationSink>,
    pub max_references: usize,
    pub match_policy: MatchPolicy,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(cfg: &Config, store: FaceStore, verifier: Arc<dyn Verifier>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            started_at: std::time::Instant::now(),
            store,
            verifier,
            notifier,
            max_references: cfg.max_references,
            match_policy: cfg.match_policy,
            max_upload_bytes: cfg.max_upload_bytes,
        }
    }
}
