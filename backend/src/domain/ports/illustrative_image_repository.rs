//! Driven port for the category-keyed image table.

use async_trait::async_trait;

use crate::domain::{IllustrativeImage, SearchKeyword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by illustrative image persistence adapters.
    pub enum IllustrativeImageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "illustrative image repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "illustrative image repository query failed: {message}",
    }
}

/// Port for storing and looking up illustrative images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IllustrativeImageRepository: Send + Sync {
    /// Insert the image, or overwrite the URL of an existing category.
    async fn upsert(&self, image: &IllustrativeImage)
    -> Result<(), IllustrativeImageRepositoryError>;

    /// Earliest stored image whose category contains `keyword` ignoring
    /// case.
    async fn find_first_matching(
        &self,
        keyword: &SearchKeyword,
    ) -> Result<Option<IllustrativeImage>, IllustrativeImageRepositoryError>;
}
