use std::env;
use std::path::PathBuf;

/// How the recognition loop treats the reference images it compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The first comparison decides the outcome, match or not.
    FirstDecisive,
    /// Any matching reference is a success; failure only after all were tried.
    AnyMatch,
}

impl MatchPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" | "first-decisive" => Some(Self::FirstDecisive),
            "any" | "any-match" => Some(Self::AnyMatch),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage_root: PathBuf,
    pub host: String,
    pub port: u16,
    pub webhook_url: String,
    pub webhook_timeout_secs: u64,
    pub verify_url: String,
    pub verify_model: String,
    pub verify_timeout_secs: u64,
    pub max_references: usize,
    pub match_policy: MatchPolicy,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let storage_root = env::var("FACESCAN_STORAGE_ROOT").unwrap_or_else(|_| "../rekachain-web/storage/app/public".to_string());
        let host = env::var("FACESCAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("FACESCAN_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(5000);
        let webhook_url = env::var("FACESCAN_WEBHOOK_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/scan-faces".to_string());
        let webhook_timeout_secs = env::var("FACESCAN_WEBHOOK_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10);
        let verify_url = env::var("FACESCAN_VERIFY_URL").unwrap_or_else(|_| "http://127.0.0.1:5005/verify".to_string());
        let verify_model = env::var("FACESCAN_VERIFY_MODEL").unwrap_or_else(|_| "Facenet".to_string());
        let verify_timeout_secs = env::var("FACESCAN_VERIFY_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(60);
        let max_references = env::var("FACESCAN_MAX_REFERENCES").ok().and_then(|v| v.parse().ok()).filter(|n: &usize| *n > 0).unwrap_or(3);
        let match_policy = env::var("FACESCAN_MATCH_POLICY").ok().and_then(|v| MatchPolicy::parse(&v)).unwrap_or(MatchPolicy::FirstDecisive);
        let max_upload_mb: usize = env::var("FACESCAN_MAX_UPLOAD_MB").ok().and_then(|v| v.parse().ok()).unwrap_or(20);
        Self {
            storage_root: PathBuf::from(storage_root),
            host,
            port,
            webhook_url,
            webhook_timeout_secs,
            verify_url,
            verify_model,
            verify_timeout_secs,
            max_references,
            match_policy,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}
