//! Keyword search over parts and illustrative images.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{
    IllustrativeImageRepository, PartSearchQuery, PartSearchResult, PartsRepository,
};
use crate::domain::{Error, SearchKeyword};

/// Message returned when a search fails for internal reasons.
pub const SEARCH_FAILED_MESSAGE: &str = "Error al buscar repuestos";

/// Domain service implementing [`PartSearchQuery`].
#[derive(Clone)]
pub struct PartSearchService<P, I> {
    parts: Arc<P>,
    images: Arc<I>,
}

impl<P, I> PartSearchService<P, I> {
    /// Create a search service over the given repositories.
    pub fn new(parts: Arc<P>, images: Arc<I>) -> Self {
        Self { parts, images }
    }
}

#[async_trait]
impl<P, I> PartSearchQuery for PartSearchService<P, I>
where
    P: PartsRepository,
    I: IllustrativeImageRepository,
{
    async fn search(&self, keyword: SearchKeyword) -> Result<PartSearchResult, Error> {
        let parts = self.parts.search(&keyword).await.map_err(|err| {
            error!(error = %err, "part search failed");
            Error::internal(SEARCH_FAILED_MESSAGE)
        })?;
        let image = self
            .images
            .find_first_matching(&keyword)
            .await
            .map_err(|err| {
                error!(error = %err, "illustrative image lookup failed");
                Error::internal(SEARCH_FAILED_MESSAGE)
            })?;

        debug!(%keyword, matches = parts.len(), image = image.is_some(), "part search");
        Ok(PartSearchResult {
            parts,
            illustrative_image_url: image.map(|image| image.url),
        })
    }
}
