//! Driving port for publishing illustrative images.

use async_trait::async_trait;

use crate::domain::{Error, IllustrativeImage, ImageUpload};

/// Driving port for image uploads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IllustrativeImageCommand: Send + Sync {
    /// Publish each upload and record it under its category.
    ///
    /// Returns the stored mappings in upload order.
    async fn upload_images(
        &self,
        uploads: Vec<ImageUpload>,
    ) -> Result<Vec<IllustrativeImage>, Error>;
}

/// Fixture command that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIllustrativeImageCommand;

#[async_trait]
impl IllustrativeImageCommand for FixtureIllustrativeImageCommand {
    async fn upload_images(
        &self,
        _uploads: Vec<ImageUpload>,
    ) -> Result<Vec<IllustrativeImage>, Error> {
        Ok(Vec::new())
    }
}
