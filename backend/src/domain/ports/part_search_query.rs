//! Driving port for keyword search over parts and images.

use async_trait::async_trait;
use url::Url;

use crate::domain::{Error, SearchKeyword, StoredPart};

/// Parts matching a keyword plus at most one matching image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartSearchResult {
    /// Matching parts in store order.
    pub parts: Vec<StoredPart>,
    /// URL of the first image whose category matches, if any.
    pub illustrative_image_url: Option<Url>,
}

/// Driving port for part search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartSearchQuery: Send + Sync {
    /// Search parts by code or brand and look up one illustrative image.
    async fn search(&self, keyword: SearchKeyword) -> Result<PartSearchResult, Error>;
}

/// Fixture query that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePartSearchQuery;

#[async_trait]
impl PartSearchQuery for FixturePartSearchQuery {
    async fn search(&self, _keyword: SearchKeyword) -> Result<PartSearchResult, Error> {
        Ok(PartSearchResult::default())
    }
}
