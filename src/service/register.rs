use anyhow::anyhow;
use tracing::{info, warn};

use super::check_user_name;
use crate::error::ScanError;
use crate::models::scan::{RegisterOutcome, UploadedFile};
use crate::AppState;

/// Store `upload` as a new reference image for `name`.
///
/// An upload that cannot be decoded as an image is a soft failure
/// (`RegisterOutcome::NoFace`), not an error.
pub async fn register(state: &AppState, name: &str, upload: UploadedFile) -> Result<RegisterOutcome, ScanError> {
    check_user_name(name)?;
    state.store.ensure_user_dir(name).await?;

    let temp = state.store.temp_upload(&upload.bytes)?;
    info!(user = %name, filename = %upload.filename, bytes = upload.bytes.len(), "registering face");

    let store = state.store.clone();
    let name_owned = name.to_string();
    let temp_path = temp.path().to_path_buf();
    let stored = tokio::task::spawn_blocking(move || -> Result<Option<std::path::PathBuf>, ScanError> {
        let reader = image::io::Reader::open(&temp_path)?.with_guessed_format()?;
        let img = match reader.decode() {
            Ok(img) => img,
            Err(e) => {
                warn!("Upload for {} is not a decodable image: {}", name_owned, e);
                return Ok(None);
            }
        };
        let path = store.save_reference(&name_owned, &img)?;
        Ok(Some(path))
    })
    .await
    .map_err(|e| ScanError::Internal(anyhow!("registration task failed: {}", e)))?;
    drop(temp);

    match stored? {
        Some(face_path) => {
            info!(user = %name, path = %face_path.display(), "face registered");
            Ok(RegisterOutcome::Registered { name: name.to_string(), face_path })
        }
        None => Ok(RegisterOutcome::NoFace),
    }
}
