//! Multipart form reading for post submissions.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;
use quill_core::domain::{CoverUpload, PostDraft};

use crate::middleware::error::{AppError, AppResult};

/// Name of the form field carrying the cover image.
const FILE_FIELD: &str = "file";

/// A fully buffered post form: text fields plus an optional cover file.
#[derive(Debug, Default)]
pub struct PostForm {
    fields: HashMap<String, String>,
    pub file: Option<CoverUpload>,
}

impl PostForm {
    /// Drain the multipart stream. Total bytes across all fields are capped at `limit`.
    pub async fn read(mut payload: Multipart, limit: usize) -> AppResult<Self> {
        let mut form = PostForm::default();
        let mut total = 0usize;

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;

            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
                total += chunk.len();
                if total > limit {
                    return Err(AppError::PayloadTooLarge(limit));
                }
                bytes.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) if name == FILE_FIELD => {
                    // Browsers send an empty part when no file was picked.
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.file = Some(CoverUpload { file_name, bytes });
                    }
                }
                _ => {
                    let value = String::from_utf8(bytes).map_err(|_| {
                        AppError::BadRequest(format!("Field '{name}' is not valid UTF-8"))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// A text field that must be present.
    pub fn required(&self, name: &str) -> AppResult<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("Missing field '{name}'")))
    }

    pub fn draft(&self) -> AppResult<PostDraft> {
        Ok(PostDraft {
            title: self.required("title")?.to_owned(),
            summary: self.required("summary")?.to_owned(),
            content: self.required("content")?.to_owned(),
        })
    }
}
