//! Directory-per-user face storage.
//!
//! ```text
//! <root>/dataset_faces/<name>/<name>_<YYYYmmdd_HHMMSS>.jpg   reference images
//! <root>/dataset_faces/.uploads/                            in-flight uploads
//! <root>/result_scan_faces/<username>_<filename>            probe copies
//! ```

mod temp;

pub use temp::TempUpload;

use std::fs::OpenOptions;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageOutputFormat};
use tracing::{debug, info};

use crate::utils::path::secure_filename;

pub const DATASET_DIR: &str = "dataset_faces";
pub const RESULTS_DIR: &str = "result_scan_faces";
const UPLOAD_DIR: &str = ".uploads";
const JPEG_QUALITY: u8 = 95;

#[derive(Clone, Debug)]
pub struct FaceStore {
    dataset_dir: PathBuf,
    results_dir: PathBuf,
    upload_dir: PathBuf,
}

impl FaceStore {
    /// Open the store under `root`, creating the dataset, results and upload
    /// directories when they are missing.
    ///
    /// The root is resolved to an absolute path so stored paths reported to
    /// clients do not depend on the working directory.
    pub fn open(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
        let root = std::fs::canonicalize(root).with_context(|| format!("Failed to resolve {}", root.display()))?;
        let dataset_dir = root.join(DATASET_DIR);
        let results_dir = root.join(RESULTS_DIR);
        let upload_dir = dataset_dir.join(UPLOAD_DIR);
        for dir in [&dataset_dir, &results_dir, &upload_dir] {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        info!(dataset = %dataset_dir.display(), results = %results_dir.display(), "face store ready");
        Ok(Self { dataset_dir, results_dir, upload_dir })
    }

    pub fn dataset_dir(&self) -> &Path { &self.dataset_dir }
    pub fn results_dir(&self) -> &Path { &self.results_dir }
    pub fn upload_dir(&self) -> &Path { &self.upload_dir }

    pub fn user_dir(&self, name: &str) -> PathBuf {
        self.dataset_dir.join(name)
    }

    pub async fn user_exists(&self, name: &str) -> bool {
        tokio::fs::metadata(self.user_dir(name))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    pub async fn ensure_user_dir(&self, name: &str) -> io::Result<PathBuf> {
        let dir = self.user_dir(name);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Write bytes to a fresh temporary file that is removed when the guard drops.
    pub fn temp_upload(&self, bytes: &[u8]) -> io::Result<TempUpload> {
        TempUpload::write_in(&self.upload_dir, bytes)
    }

    /// Encode `image` as a new JPEG reference for `name`.
    ///
    /// Existing references are never replaced: when another registration
    /// already claimed this second's timestamp a numeric suffix is added.
    /// Blocking; call from `spawn_blocking`.
    pub fn save_reference(&self, name: &str, image: &DynamicImage) -> Result<PathBuf> {
        let dir = self.user_dir(name);
        std::fs::create_dir_all(&dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

        let mut attempt = 0u32;
        loop {
            let filename = if attempt == 0 {
                format!("{}_{}.jpg", name, stamp)
            } else {
                format!("{}_{}_{}.jpg", name, stamp, attempt)
            };
            let path = dir.join(filename);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    let mut writer = BufWriter::new(file);
                    if let Err(e) = rgb.write_to(&mut writer, ImageOutputFormat::Jpeg(JPEG_QUALITY)) {
                        drop(writer);
                        let _ = std::fs::remove_file(&path);
                        return Err(e).context("Failed to encode reference image");
                    }
                    debug!(path = %path.display(), "stored reference image");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e).with_context(|| format!("Failed to create {}", path.display())),
            }
        }
    }

    /// Up to `limit` reference images for `name`, in directory order.
    pub async fn list_references(&self, name: &str, limit: usize) -> io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(self.user_dir(name)).await?;
        let mut refs = Vec::new();
        while refs.len() < limit {
            let Some(entry) = entries.next_entry().await? else { break };
            if entry.file_type().await?.is_file() {
                refs.push(entry.path());
            }
        }
        Ok(refs)
    }

    /// Copy the probe into the results directory as `<username>_<filename>`
    /// and return the stored file name. A previous result with the same name
    /// is overwritten.
    pub async fn record_result(&self, username: &str, filename: &str, bytes: &[u8]) -> io::Result<String> {
        let result_name = result_file_name(username, filename);
        let path = self.results_dir.join(&result_name);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), "recorded scan result");
        Ok(result_name)
    }
}

pub fn result_file_name(username: &str, filename: &str) -> String {
    let safe = secure_filename(filename);
    let safe = if safe.is_empty() { "upload".to_string() } else { safe };
    format!("{}_{}", username, safe)
}
