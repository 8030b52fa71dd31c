//! Test utilities for the backend crate.
//!
//! In-memory adapters for every driven port plus a multipart body builder.
//! Shared by unit tests in `src/` and, through the `test-support` feature, by
//! integration tests in `tests/`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use url::Url;

use crate::domain::ports::{
    AssetStore, AssetStoreError, IllustrativeImageRepository, IllustrativeImageRepositoryError,
    PartsRepository, PartsRepositoryError, WorkbookReader, WorkbookReaderError,
};
use crate::domain::{
    CellValue, IllustrativeImage, ImageUpload, PartRecord, SearchKeyword, Sheet, StoredPart,
    Workbook,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for `multipart/form-data` request bodies.
///
/// # Examples
/// ```
/// use inventory_backend::test_support::MultipartBody;
///
/// let (content_type, body) = MultipartBody::new()
///     .text("categoria", "filtros")
///     .file("imagenes", "filtro.png", b"png")
///     .finish();
/// assert!(content_type.starts_with("multipart/form-data; boundary="));
/// assert!(!body.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    /// Start an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: "----inventory-test-boundary".to_owned(),
            body: Vec::new(),
        }
    }

    /// Append a file part.
    #[must_use]
    pub fn file(mut self, field: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a text part.
    #[must_use]
    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Close the body, returning the `Content-Type` header value and bytes.
    #[must_use]
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// Parts repository holding rows in memory with `SERIAL`-like identifiers.
///
/// Writes are all-or-nothing, matching the transactional adapter.
#[derive(Debug, Default)]
pub struct InMemoryPartsRepository {
    rows: Mutex<(i32, Vec<StoredPart>)>,
    fail_writes: AtomicBool,
}

impl InMemoryPartsRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail without touching stored rows.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Stored rows in identifier order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StoredPart> {
        lock(&self.rows).1.clone()
    }

    fn check_writable(&self) -> Result<(), PartsRepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PartsRepositoryError::query("writes disabled"))
        } else {
            Ok(())
        }
    }

    fn insert(state: &mut (i32, Vec<StoredPart>), records: &[PartRecord]) -> u64 {
        for record in records {
            state.0 += 1;
            state.1.push(StoredPart {
                id: state.0,
                part: record.clone(),
            });
        }
        records.len() as u64
    }
}

#[async_trait]
impl PartsRepository for InMemoryPartsRepository {
    async fn append(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError> {
        self.check_writable()?;
        Ok(Self::insert(&mut lock(&self.rows), records))
    }

    async fn replace_all(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError> {
        self.check_writable()?;
        let mut state = lock(&self.rows);
        state.1.clear();
        Ok(Self::insert(&mut state, records))
    }

    async fn clear_all(&self) -> Result<u64, PartsRepositoryError> {
        self.check_writable()?;
        let mut state = lock(&self.rows);
        let deleted = state.1.len() as u64;
        state.1.clear();
        Ok(deleted)
    }

    async fn search(
        &self,
        keyword: &SearchKeyword,
    ) -> Result<Vec<StoredPart>, PartsRepositoryError> {
        Ok(lock(&self.rows)
            .1
            .iter()
            .filter(|stored| {
                [&stored.part.code, &stored.part.brand]
                    .into_iter()
                    .flatten()
                    .any(|text| keyword.matches(text))
            })
            .cloned()
            .collect())
    }
}

/// Illustrative image repository keyed by category, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryIllustrativeImageRepository {
    images: Mutex<Vec<IllustrativeImage>>,
}

impl InMemoryIllustrativeImageRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored images in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<IllustrativeImage> {
        lock(&self.images).clone()
    }
}

#[async_trait]
impl IllustrativeImageRepository for InMemoryIllustrativeImageRepository {
    async fn upsert(
        &self,
        image: &IllustrativeImage,
    ) -> Result<(), IllustrativeImageRepositoryError> {
        let mut images = lock(&self.images);
        match images
            .iter_mut()
            .find(|stored| stored.category == image.category)
        {
            Some(stored) => stored.url = image.url.clone(),
            None => images.push(image.clone()),
        }
        Ok(())
    }

    async fn find_first_matching(
        &self,
        keyword: &SearchKeyword,
    ) -> Result<Option<IllustrativeImage>, IllustrativeImageRepositoryError> {
        Ok(lock(&self.images)
            .iter()
            .find(|image| keyword.matches(image.category.as_str()))
            .cloned())
    }
}

/// Asset store that records uploads and returns predictable URLs.
///
/// The n-th upload (1-based) of `name.png` is published at
/// `https://assets.invalid/v{n}/name.png`.
#[derive(Debug, Default)]
pub struct RecordingAssetStore {
    uploads: Mutex<Vec<String>>,
}

impl RecordingAssetStore {
    /// Create a store with no recorded uploads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File names uploaded so far.
    #[must_use]
    pub fn uploaded(&self) -> Vec<String> {
        lock(&self.uploads).clone()
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    async fn upload(&self, asset: &ImageUpload) -> Result<Url, AssetStoreError> {
        let mut uploads = lock(&self.uploads);
        uploads.push(asset.file_name.clone());
        Url::parse("https://assets.invalid/")
            .and_then(|base| base.join(&format!("v{}/{}", uploads.len(), asset.file_name)))
            .map_err(|err| AssetStoreError::invalid_response(err.to_string()))
    }
}

/// Workbook reader returning a fixed workbook for any input.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkbookReader {
    workbook: Workbook,
}

impl StaticWorkbookReader {
    /// Reader yielding `workbook`.
    #[must_use]
    pub fn new(workbook: Workbook) -> Self {
        Self { workbook }
    }

    /// Reader yielding one sheet named `Inventario` with `rows`.
    #[must_use]
    pub fn inventory(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(Workbook {
            sheets: vec![Sheet {
                name: "Inventario".to_owned(),
                rows,
            }],
        })
    }
}

#[async_trait]
impl WorkbookReader for StaticWorkbookReader {
    async fn read_workbook(&self, _bytes: Vec<u8>) -> Result<Workbook, WorkbookReaderError> {
        Ok(self.workbook.clone())
    }
}

/// Text cell shorthand.
#[must_use]
pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_owned())
}

/// Stock ledger header row in canonical column order.
#[must_use]
pub fn stock_ledger_header() -> Vec<CellValue> {
    [
        "CODIGO",
        "MARCA",
        "ENTRADAS",
        "SALIDAS",
        "STOCK",
        "PRECIOS",
        "IMPORTE_INVENTARIO",
    ]
    .into_iter()
    .map(text)
    .collect()
}
