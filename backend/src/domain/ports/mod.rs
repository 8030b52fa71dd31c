//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`AssetStore`], [`WorkbookReader`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and called from inbound adapters. Each
//! driven port carries a typed error enum so adapters map their failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod asset_store;
mod illustrative_image_command;
mod illustrative_image_repository;
mod inventory_ingestion_command;
mod part_search_query;
mod parts_repository;
mod workbook_reader;

#[cfg(test)]
pub use asset_store::MockAssetStore;
pub use asset_store::{AssetStore, AssetStoreError};
#[cfg(test)]
pub use illustrative_image_command::MockIllustrativeImageCommand;
pub use illustrative_image_command::{
    FixtureIllustrativeImageCommand, IllustrativeImageCommand,
};
#[cfg(test)]
pub use illustrative_image_repository::MockIllustrativeImageRepository;
pub use illustrative_image_repository::{
    IllustrativeImageRepository, IllustrativeImageRepositoryError,
};
#[cfg(test)]
pub use inventory_ingestion_command::MockInventoryIngestionCommand;
pub use inventory_ingestion_command::{
    FixtureInventoryIngestionCommand, IngestMode, IngestReport, IngestRequest,
    InventoryIngestionCommand,
};
#[cfg(test)]
pub use part_search_query::MockPartSearchQuery;
pub use part_search_query::{FixturePartSearchQuery, PartSearchQuery, PartSearchResult};
#[cfg(test)]
pub use parts_repository::MockPartsRepository;
pub use parts_repository::{PartsRepository, PartsRepositoryError};
#[cfg(test)]
pub use workbook_reader::MockWorkbookReader;
pub use workbook_reader::{WorkbookReader, WorkbookReaderError};
