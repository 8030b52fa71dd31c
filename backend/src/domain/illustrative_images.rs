//! Illustrative image publishing service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    AssetStore, AssetStoreError, IllustrativeImageCommand, IllustrativeImageRepository,
};
use crate::domain::{
    Error, IllustrativeImage, ImageCategory, ImageUpload, MAX_IMAGES_PER_UPLOAD, is_image_file,
};

/// Message returned when publishing fails for internal reasons.
pub const UPLOAD_FAILED_MESSAGE: &str = "Error al subir imágenes ilustrativas";

/// Domain service implementing [`IllustrativeImageCommand`].
#[derive(Clone)]
pub struct IllustrativeImageService<A, R> {
    assets: Arc<A>,
    images: Arc<R>,
}

impl<A, R> IllustrativeImageService<A, R> {
    /// Create a service publishing to `assets` and recording in `images`.
    pub fn new(assets: Arc<A>, images: Arc<R>) -> Self {
        Self { assets, images }
    }
}

/// Resolve the category for each upload and reject the batch if any file is
/// unacceptable. Nothing is published unless the whole batch passes.
fn validate_batch(uploads: &[ImageUpload]) -> Result<Vec<ImageCategory>, Error> {
    if uploads.is_empty() {
        return Err(Error::invalid_request("No se recibieron imágenes"));
    }
    if uploads.len() > MAX_IMAGES_PER_UPLOAD {
        return Err(Error::invalid_request(format!(
            "Se permiten como máximo {MAX_IMAGES_PER_UPLOAD} imágenes por carga"
        ))
        .with_details(json!({ "max": MAX_IMAGES_PER_UPLOAD, "received": uploads.len() })));
    }

    uploads
        .iter()
        .enumerate()
        .map(|(index, upload)| {
            if !is_image_file(&upload.file_name) {
                return Err(Error::unsupported_file_type(
                    "Solo se permiten imágenes (.jpg, .jpeg, .png, .webp)",
                )
                .with_details(json!({ "fileName": upload.file_name })));
            }
            match upload.label.as_deref() {
                Some(label) => ImageCategory::new(label).map_err(|_| {
                    Error::invalid_request("La categoría no puede estar vacía")
                        .with_details(json!({ "index": index }))
                }),
                None => Ok(ImageCategory::positional(index + 1)),
            }
        })
        .collect()
}

fn map_asset_error(err: &AssetStoreError) -> Error {
    error!(error = %err, "asset upload failed");
    match err {
        AssetStoreError::Unavailable { .. } => Error::service_unavailable(UPLOAD_FAILED_MESSAGE),
        AssetStoreError::Rejected { .. } | AssetStoreError::InvalidResponse { .. } => {
            Error::internal(UPLOAD_FAILED_MESSAGE)
        }
    }
}

#[async_trait]
impl<A, R> IllustrativeImageCommand for IllustrativeImageService<A, R>
where
    A: AssetStore,
    R: IllustrativeImageRepository,
{
    async fn upload_images(
        &self,
        uploads: Vec<ImageUpload>,
    ) -> Result<Vec<IllustrativeImage>, Error> {
        let categories = validate_batch(&uploads)?;

        let mut stored = Vec::with_capacity(uploads.len());
        for (upload, category) in uploads.iter().zip(categories) {
            let url = self
                .assets
                .upload(upload)
                .await
                .map_err(|err| map_asset_error(&err))?;
            let image = IllustrativeImage { category, url };
            self.images.upsert(&image).await.map_err(|err| {
                error!(error = %err, "illustrative image upsert failed");
                Error::internal(UPLOAD_FAILED_MESSAGE)
            })?;
            info!(category = %image.category, url = %image.url, "illustrative image stored");
            stored.push(image);
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        IllustrativeImageRepositoryError, MockAssetStore, MockIllustrativeImageRepository,
    };
    use rstest::rstest;
    use url::Url;

    fn upload(file_name: &str, label: Option<&str>) -> ImageUpload {
        ImageUpload {
            label: label.map(str::to_owned),
            file_name: file_name.to_owned(),
            content_type: Some("image/png".to_owned()),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn echo_assets() -> MockAssetStore {
        let mut assets = MockAssetStore::new();
        assets.expect_upload().returning(|asset| {
            Ok(Url::parse("https://res.cloudinary.com/demo/")
                .and_then(|base| base.join(&asset.file_name))
                .expect("valid url"))
        });
        assets
    }

    #[rstest]
    #[tokio::test]
    async fn positional_labels_are_used_without_categories() {
        let mut images = MockIllustrativeImageRepository::new();
        images.expect_upsert().times(2).returning(|_| Ok(()));
        let service = IllustrativeImageService::new(Arc::new(echo_assets()), Arc::new(images));

        let stored = service
            .upload_images(vec![upload("a.png", None), upload("b.jpg", None)])
            .await
            .expect("upload succeeds");

        let categories: Vec<_> = stored.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["elemento 1", "elemento 2"]);
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_labels_are_normalised() {
        let mut images = MockIllustrativeImageRepository::new();
        images
            .expect_upsert()
            .withf(|image| image.category.as_str() == "pastillas de freno")
            .times(1)
            .returning(|_| Ok(()));
        let service = IllustrativeImageService::new(Arc::new(echo_assets()), Arc::new(images));

        let stored = service
            .upload_images(vec![upload("p.webp", Some(" Pastillas de Freno "))])
            .await
            .expect("upload succeeds");

        assert_eq!(
            stored.first().map(|i| i.url.as_str()),
            Some("https://res.cloudinary.com/demo/p.webp")
        );
    }

    #[rstest]
    #[case(Vec::new(), ErrorCode::InvalidRequest)]
    #[case((0..11).map(|i| upload(&format!("{i}.png"), None)).collect(), ErrorCode::InvalidRequest)]
    #[case(vec![upload("a.png", None), upload("notes.txt", None)], ErrorCode::UnsupportedFileType)]
    #[case(vec![upload("a.png", Some("   "))], ErrorCode::InvalidRequest)]
    #[tokio::test]
    async fn invalid_batches_upload_nothing(
        #[case] uploads: Vec<ImageUpload>,
        #[case] expected: ErrorCode,
    ) {
        let mut assets = MockAssetStore::new();
        assets.expect_upload().never();
        let mut images = MockIllustrativeImageRepository::new();
        images.expect_upsert().never();
        let service = IllustrativeImageService::new(Arc::new(assets), Arc::new(images));

        let err = service
            .upload_images(uploads)
            .await
            .expect_err("batch is rejected");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[case(AssetStoreError::unavailable("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(AssetStoreError::rejected("bad signature"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn asset_failures_are_mapped(#[case] failure: AssetStoreError, #[case] expected: ErrorCode) {
        let mut assets = MockAssetStore::new();
        assets.expect_upload().return_once(move |_| Err(failure));
        let mut images = MockIllustrativeImageRepository::new();
        images.expect_upsert().never();
        let service = IllustrativeImageService::new(Arc::new(assets), Arc::new(images));

        let err = service
            .upload_images(vec![upload("a.png", None)])
            .await
            .expect_err("asset failure propagates");

        assert_eq!(err.code(), expected);
        assert_eq!(err.message(), UPLOAD_FAILED_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_are_internal() {
        let mut images = MockIllustrativeImageRepository::new();
        images
            .expect_upsert()
            .return_once(|_| Err(IllustrativeImageRepositoryError::connection("down")));
        let service = IllustrativeImageService::new(Arc::new(echo_assets()), Arc::new(images));

        let err = service
            .upload_images(vec![upload("a.png", None)])
            .await
            .expect_err("upsert failure propagates");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
