//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureIllustrativeImageCommand, FixtureInventoryIngestionCommand, FixturePartSearchQuery,
    IllustrativeImageCommand, IngestMode, InventoryIngestionCommand, PartSearchQuery,
};

/// Default cap on a single multipart upload, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request-handling limits and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted multipart body, summed over all parts.
    pub max_upload_bytes: usize,
    /// Mode used when a stock upload does not name one.
    pub default_ingest_mode: IngestMode,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_ingest_mode: IngestMode::default(),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Workbook ingestion and inventory clearing.
    pub ingestion: Arc<dyn InventoryIngestionCommand>,
    /// Part search.
    pub parts: Arc<dyn PartSearchQuery>,
    /// Illustrative image publishing.
    pub images: Arc<dyn IllustrativeImageCommand>,
    /// Upload limits and defaults.
    pub limits: UploadLimits,
}

impl HttpState {
    /// Construct state from port implementations with default limits.
    pub fn new(
        ingestion: Arc<dyn InventoryIngestionCommand>,
        parts: Arc<dyn PartSearchQuery>,
        images: Arc<dyn IllustrativeImageCommand>,
    ) -> Self {
        Self {
            ingestion,
            parts,
            images,
            limits: UploadLimits::default(),
        }
    }

    /// Replace the upload limits.
    #[must_use]
    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureInventoryIngestionCommand),
            Arc::new(FixturePartSearchQuery),
            Arc::new(FixtureIllustrativeImageCommand),
        )
    }
}
