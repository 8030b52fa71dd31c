//! Driven port for the external image host.

use async_trait::async_trait;
use url::Url;

use crate::domain::ImageUpload;

use super::define_port_error;

define_port_error! {
    /// Errors raised when publishing an asset.
    pub enum AssetStoreError {
        /// The host could not be reached or timed out.
        Unavailable { message: String } =>
            "asset host unavailable: {message}",
        /// The host refused the upload.
        Rejected { message: String } =>
            "asset host rejected upload: {message}",
        /// The host answered with a payload that could not be understood.
        InvalidResponse { message: String } =>
            "asset host returned an invalid response: {message}",
    }
}

/// Port for publishing images to object storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `asset` and return its public HTTPS URL.
    async fn upload(&self, asset: &ImageUpload) -> Result<Url, AssetStoreError>;
}
