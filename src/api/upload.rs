use std::collections::HashMap;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use tracing::debug;

use crate::error::ScanError;
use crate::models::scan::UploadedFile;

fn multipart_error(e: MultipartError) -> ScanError {
    ScanError::Multipart(e.status(), e.body_text())
}

/// A parsed multipart form: the `file` part plus every text field.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// A body that is not multipart at all is treated like a form without a file.
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, ScanError> {
        let mut multipart = match multipart {
            Ok(m) => m,
            Err(e) => {
                debug!("request is not a multipart form: {}", e);
                return Ok(Self::default());
            }
        };

        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile { filename, bytes });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// The uploaded file; an absent part or an empty client filename is rejected.
    pub fn take_file(&mut self) -> Result<UploadedFile, ScanError> {
        let file = self.file.take().ok_or(ScanError::MissingFile)?;
        if file.filename.is_empty() {
            return Err(ScanError::EmptyFilename);
        }
        Ok(file)
    }

    pub fn field(&self, name: &'static str) -> Result<String, ScanError> {
        match self.fields.get(name) {
            Some(v) if !v.is_empty() => Ok(v.clone()),
            _ => Err(ScanError::MissingField(name)),
        }
    }
}
