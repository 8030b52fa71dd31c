//! Buffered multipart extraction shared by the upload endpoints.
//!
//! Parts carrying a filename are collected as files; the rest are decoded as
//! UTF-8 text fields. The combined size of all parts is capped so an
//! oversized upload is refused before it is held in memory, and each file
//! part is vetted by name before its contents are read.

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Message returned when the body is not valid multipart data.
pub const MALFORMED_MULTIPART_MESSAGE: &str = "La solicitud multipart no es válida";

/// One file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Form field name.
    pub field: String,
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// All parts of one multipart body, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// File parts.
    pub files: Vec<UploadedFile>,
    /// Text parts as `(field, value)`.
    pub texts: Vec<(String, String)>,
}

impl MultipartForm {
    /// Text values submitted under `field`.
    pub fn texts_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> {
        self.texts
            .iter()
            .filter(move |(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Consume the form, returning only the files submitted under `field`.
    pub fn into_files_named(self, field: &str) -> Vec<UploadedFile> {
        self.files
            .into_iter()
            .filter(|file| file.field == field)
            .collect()
    }
}

fn malformed(err: &MultipartError) -> Error {
    debug!(error = %err, "malformed multipart body");
    Error::invalid_request(MALFORMED_MULTIPART_MESSAGE)
}

fn too_large(max_bytes: usize) -> Error {
    Error::payload_too_large("El archivo supera el tamaño máximo permitido")
        .with_details(json!({ "maxBytes": max_bytes }))
}

async fn read_field(field: &mut Field, budget: &mut usize, max_bytes: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| malformed(&err))? {
        *budget = budget.checked_sub(chunk.len()).ok_or_else(|| too_large(max_bytes))?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Accepts every file part.
pub fn accept_any_file(_field: &str, _file_name: &str) -> Result<(), Error> {
    Ok(())
}

/// Buffer every part of `payload`, refusing bodies over `max_bytes`.
///
/// `accept_file` sees the field and file name of each file part before any
/// of its bytes are read; an error from it aborts the whole form.
pub async fn collect_form<F>(
    mut payload: Multipart,
    max_bytes: usize,
    accept_file: F,
) -> Result<MultipartForm, Error>
where
    F: Fn(&str, &str) -> Result<(), Error>,
{
    let mut form = MultipartForm::default();
    let mut budget = max_bytes;

    while let Some(mut field) = payload.try_next().await.map_err(|err| malformed(&err))? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        if let Some(file_name) = &file_name {
            accept_file(&name, file_name)?;
        }
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = read_field(&mut field, &mut budget, max_bytes).await?;

        match file_name {
            Some(file_name) => form.files.push(UploadedFile {
                field: name,
                file_name,
                content_type,
                bytes,
            }),
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| Error::invalid_request(MALFORMED_MULTIPART_MESSAGE))?;
                form.texts.push((name, value));
            }
        }
    }
    Ok(form)
}
