//! Collects `multipart/form-data` payloads into text fields and at most one file.
use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use log::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ServerError;

/// Uploaded files larger than this are refused.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Reads the whole payload. Parts with a filename are treated as files; only one file, from one of the
    /// `file_fields`, is kept. Empty file parts, which browsers send when no file was chosen, are skipped.
    pub async fn collect(mut payload: Multipart, file_fields: &[&str]) -> Result<Self, ServerError> {
        let mut form = MultipartForm::default();
        while let Some(field) = payload.try_next().await.map_err(|e| ServerError::InvalidRequestBody(e.to_string()))? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.content_disposition().and_then(|cd| cd.get_filename()).map(String::from);
            match filename {
                Some(filename) => {
                    let bytes = read_field(field, MAX_FILE_SIZE).await?;
                    if bytes.is_empty() {
                        continue;
                    }
                    if !file_fields.contains(&name.as_str()) {
                        warn!("💻️ Ignoring unexpected file in field '{name}'");
                        continue;
                    }
                    if form.file.is_some() {
                        return Err(ServerError::ValidationError("Only one file may be uploaded".into()));
                    }
                    trace!("💻️ Received {} bytes for {filename}", bytes.len());
                    form.file = Some(UploadedFile { field_name: name, filename, bytes });
                },
                None => {
                    let bytes = read_field(field, MAX_TEXT_FIELD_SIZE).await?;
                    let value = String::from_utf8(bytes)
                        .map_err(|_| ServerError::ValidationError(format!("'{name}' must be valid text")))?;
                    form.fields.insert(name, value);
                },
            }
        }
        Ok(form)
    }

    /// Deserializes the text fields into `T`, as though they had been sent as a JSON object of strings.
    pub fn deserialize_fields<T: DeserializeOwned>(&self) -> Result<T, ServerError> {
        let map = self.fields.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect::<Map<_, _>>();
        serde_json::from_value(Value::Object(map)).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))
    }
}

async fn read_field(mut field: Field, limit: usize) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| ServerError::InvalidRequestBody(e.to_string()))? {
        if bytes.len() + chunk.len() > limit {
            return Err(ServerError::ValidationError(format!("Uploads are limited to {limit} bytes")));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
