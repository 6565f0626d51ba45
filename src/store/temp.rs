use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

/// An uploaded file staged on disk for the duration of one request.
///
/// The file is deleted when the guard is dropped, so every exit path of a
/// handler (success, soft failure, error, early return) cleans it up.
pub struct TempUpload {
    file: Option<NamedTempFile>,
}

impl TempUpload {
    pub(crate) fn write_in(dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new().prefix("upload-").tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file: Some(file) })
    }

    pub fn path(&self) -> &Path {
        match &self.file {
            Some(f) => f.path(),
            None => Path::new(""),
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                warn!("Failed to remove temporary upload {}: {}", path.display(), e);
            }
        }
    }
}
