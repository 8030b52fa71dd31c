//! Domain primitives, services, and ports.
//!
//! Purpose: hold the inventory model and the ingestion, search, and image
//! publishing behaviour independently of HTTP, PostgreSQL, or any spreadsheet
//! library. Adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - PartRecord / StoredPart / SearchKeyword: inventory rows and search input.
//! - IllustrativeImage / ImageCategory / ImageUpload: category-keyed images.
//! - Workbook / Sheet / CellValue / RawRow: parsed spreadsheet model.
//! - RowMapper and the numeric normalisers: pure row conversion.
//! - InventoryIngestionService / PartSearchService / IllustrativeImageService.

pub mod error;
pub mod illustrative_image;
pub mod illustrative_images;
pub mod inventory_ingestion;
pub mod numeric;
pub mod part;
pub mod part_search;
pub mod ports;
pub mod row_mapper;
pub mod trace_id;
pub mod upload_policy;
pub mod workbook;

pub use self::error::{Error, ErrorCode};
pub use self::illustrative_image::{
    IllustrativeImage, ImageCategory, ImageCategoryError, ImageUpload,
};
pub use self::illustrative_images::IllustrativeImageService;
pub use self::inventory_ingestion::{InventoryIngestionService, stage_rows};
pub use self::numeric::{normalize_decimal, normalize_decimal_text, parse_count};
pub use self::part::{MAX_KEYWORD_CHARS, PartRecord, SearchKeyword, SearchKeywordError, StoredPart};
pub use self::part_search::PartSearchService;
pub use self::row_mapper::{
    CanonicalField, ColumnProfile, HeaderAliases, HeaderMatching, MappedRow, RowMapper,
    UnknownKeywordError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upload_policy::{
    IMAGE_EXTENSIONS, MAX_IMAGES_PER_UPLOAD, WORKBOOK_EXTENSIONS, is_image_file,
    is_workbook_file,
};
pub use self::workbook::{CellValue, INVENTORY_SHEET_MARKER, RawRow, Sheet, Workbook};

/// Result alias for driving-port operations.
///
/// # Examples
/// ```
/// use inventory_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::invalid_request("Falta el parámetro de búsqueda"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
