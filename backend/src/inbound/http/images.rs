//! Illustrative image upload endpoint.
//!
//! ```text
//! POST /imagenes   (multipart fields `imagenes`, optional `categoria`)
//! ```
//!
//! The n-th `categoria` text field labels the n-th image. Images without a
//! matching label are filed under `elemento N`.

use actix_multipart::Multipart;
use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{IllustrativeImage, ImageUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{MultipartForm, accept_any_file, collect_form};
use crate::inbound::http::state::HttpState;

/// Multipart field carrying image files.
pub const IMAGES_FIELD: &str = "imagenes";
/// Multipart text field carrying category labels.
pub const CATEGORY_FIELD: &str = "categoria";

/// Multipart body accepted by [`upload_images`].
#[derive(ToSchema)]
pub struct ImageUploadForm {
    /// Up to ten image files (`.jpg`, `.jpeg`, `.png`, `.webp`).
    #[schema(value_type = Vec<String>, format = Binary)]
    pub imagenes: Vec<Vec<u8>>,
    /// Optional category label per image, in the same order.
    pub categoria: Vec<String>,
}

/// One stored category mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredImageDto {
    /// Normalised category.
    #[schema(example = "elemento 1")]
    pub categoria: String,
    /// Hosted image URL.
    pub url: String,
}

impl From<IllustrativeImage> for StoredImageDto {
    fn from(image: IllustrativeImage) -> Self {
        Self {
            categoria: image.category.into(),
            url: image.url.into(),
        }
    }
}

/// Response for a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponse {
    /// Human-readable summary.
    #[schema(example = "🖼️ Imágenes ilustrativas guardadas correctamente")]
    pub message: String,
    /// Stored mappings in upload order.
    pub imagenes: Vec<StoredImageDto>,
}

fn to_uploads(form: MultipartForm) -> Vec<ImageUpload> {
    let labels: Vec<String> = form.texts_named(CATEGORY_FIELD).map(str::to_owned).collect();
    form.into_files_named(IMAGES_FIELD)
        .into_iter()
        .enumerate()
        .map(|(index, file)| ImageUpload {
            label: labels.get(index).cloned(),
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        })
        .collect()
}

/// Publish illustrative images and record them by category.
#[utoipa::path(
    post,
    path = "/imagenes",
    tags = ["images"],
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images stored", body = ImageUploadResponse),
        (status = 400, description = "No images, too many images, or wrong file type", body = crate::domain::Error),
        (status = 413, description = "Upload too large", body = crate::domain::Error),
        (status = 500, description = "Upload or persistence failure", body = crate::domain::Error),
        (status = 503, description = "Asset host unavailable", body = crate::domain::Error)
    )
)]
#[post("/imagenes")]
pub async fn upload_images(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<web::Json<ImageUploadResponse>> {
    let form = collect_form(payload, state.limits.max_upload_bytes, accept_any_file).await?;
    let stored = state.images.upload_images(to_uploads(form)).await?;
    Ok(web::Json(ImageUploadResponse {
        message: "🖼️ Imágenes ilustrativas guardadas correctamente".to_owned(),
        imagenes: stored.into_iter().map(StoredImageDto::from).collect(),
    }))
}
