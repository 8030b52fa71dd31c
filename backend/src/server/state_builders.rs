//! Builders wiring domain services to their PostgreSQL, calamine and
//! Cloudinary adapters.

use std::sync::Arc;

use mockable::DefaultClock;

use inventory_backend::domain::{
    IllustrativeImageService, InventoryIngestionService, PartSearchService,
};
use inventory_backend::inbound::http::state::{HttpState, UploadLimits};
use inventory_backend::outbound::assets::{CloudinaryAssetStore, CloudinaryConfig};
use inventory_backend::outbound::persistence::{
    DbPool, DieselIllustrativeImageRepository, DieselPartsRepository,
};
use inventory_backend::outbound::spreadsheet::CalamineWorkbookReader;
use inventory_backend::settings::IngestionSettings;

/// Adapter settings consumed by [`build_http_state`].
pub struct StateSettings {
    /// Row mapping options for workbook ingestion.
    pub ingestion: IngestionSettings,
    /// Cloudinary credentials and upload folder.
    pub cloudinary: CloudinaryConfig,
    /// Multipart size cap and default ingest mode.
    pub upload_limits: UploadLimits,
}

/// Build the handler state backed by `pool`.
///
/// # Errors
/// Returns [`std::io::Error`] when the Cloudinary client cannot be built.
pub fn build_http_state(pool: &DbPool, settings: StateSettings) -> std::io::Result<HttpState> {
    let StateSettings {
        ingestion,
        cloudinary,
        upload_limits,
    } = settings;

    let parts = Arc::new(DieselPartsRepository::new(pool.clone()));
    let images = Arc::new(DieselIllustrativeImageRepository::new(pool.clone()));
    let assets = CloudinaryAssetStore::new(cloudinary, Arc::new(DefaultClock))
        .map_err(|err| std::io::Error::other(format!("cloudinary client: {err}")))?;

    let ingestion_service =
        InventoryIngestionService::new(Arc::new(CalamineWorkbookReader::new()), parts.clone())
            .with_mapper(ingestion.row_mapper())
            .with_header_row_offset(ingestion.header_row_offset);
    let search_service = PartSearchService::new(parts, images.clone());
    let image_service = IllustrativeImageService::new(Arc::new(assets), images);

    Ok(HttpState::new(
        Arc::new(ingestion_service),
        Arc::new(search_service),
        Arc::new(image_service),
    )
    .with_limits(upload_limits))
}
