//! Stock workbook ingestion service.
//!
//! The service owns the row pipeline:
//! - sheet selection and header-row offset;
//! - mapping rows through [`RowMapper`] and counting blank rows;
//! - handing the staged batch to the repository under the requested mode.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    IngestMode, IngestReport, IngestRequest, InventoryIngestionCommand, PartsRepository,
    PartsRepositoryError, WorkbookReader, WorkbookReaderError,
};
use crate::domain::{Error, MappedRow, PartRecord, RawRow, RowMapper};

/// Message returned when the upload is not a readable workbook.
pub const INVALID_WORKBOOK_MESSAGE: &str = "El archivo no es un libro de Excel válido";
/// Message returned when the workbook has no sheets.
pub const EMPTY_WORKBOOK_MESSAGE: &str = "El archivo Excel no contiene hojas";
/// Message returned when ingestion fails for internal reasons.
pub const INGEST_FAILED_MESSAGE: &str = "Error al procesar el archivo Excel";
/// Message returned when clearing the inventory fails.
pub const CLEAR_FAILED_MESSAGE: &str = "Error al eliminar repuestos";

/// Domain service implementing [`InventoryIngestionCommand`].
#[derive(Clone)]
pub struct InventoryIngestionService<W, P> {
    reader: Arc<W>,
    parts: Arc<P>,
    mapper: RowMapper,
    header_row_offset: usize,
}

impl<W, P> InventoryIngestionService<W, P> {
    /// Create a service with the default mapper and no leading rows skipped.
    pub fn new(reader: Arc<W>, parts: Arc<P>) -> Self {
        Self {
            reader,
            parts,
            mapper: RowMapper::default(),
            header_row_offset: 0,
        }
    }

    /// Replace the row mapper.
    #[must_use]
    pub fn with_mapper(mut self, mapper: RowMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Number of sheet rows above the header row.
    #[must_use]
    pub fn with_header_row_offset(mut self, header_row_offset: usize) -> Self {
        self.header_row_offset = header_row_offset;
        self
    }
}

/// Run every row through `mapper`, returning accepted records and the number
/// of rejected rows.
#[must_use]
pub fn stage_rows(mapper: &RowMapper, rows: &[RawRow]) -> (Vec<PartRecord>, usize) {
    let mut staged = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        match mapper.map(row) {
            MappedRow::Accepted(record) => staged.push(record),
            MappedRow::Rejected => skipped += 1,
        }
    }
    (staged, skipped)
}

#[async_trait]
impl<W, P> InventoryIngestionCommand for InventoryIngestionService<W, P>
where
    W: WorkbookReader,
    P: PartsRepository,
{
    async fn ingest(&self, request: IngestRequest) -> Result<IngestReport, Error> {
        let IngestRequest { workbook, mode } = request;
        let workbook = self
            .reader
            .read_workbook(workbook)
            .await
            .map_err(map_reader_error)?;
        let sheet = workbook
            .select_inventory_sheet()
            .ok_or_else(|| Error::invalid_workbook(EMPTY_WORKBOOK_MESSAGE))?;

        let rows = sheet.records(self.header_row_offset);
        let (staged, skipped) = stage_rows(&self.mapper, &rows);

        let persisted = match mode {
            IngestMode::Append => self.parts.append(&staged).await,
            IngestMode::Replace => self.parts.replace_all(&staged).await,
        }
        .map_err(|err| map_parts_error(&err, INGEST_FAILED_MESSAGE))?;

        info!(
            sheet = %sheet.name,
            %mode,
            accepted = staged.len(),
            skipped,
            persisted,
            "inventory workbook ingested"
        );
        Ok(IngestReport {
            accepted: staged.len(),
            skipped,
            mode,
        })
    }

    async fn clear_inventory(&self) -> Result<u64, Error> {
        let deleted = self
            .parts
            .clear_all()
            .await
            .map_err(|err| map_parts_error(&err, CLEAR_FAILED_MESSAGE))?;
        info!(deleted, "inventory cleared");
        Ok(deleted)
    }
}

fn map_reader_error(err: WorkbookReaderError) -> Error {
    match err {
        WorkbookReaderError::Unreadable { message } => {
            info!(reason = %message, "rejected unreadable workbook");
            Error::invalid_workbook(INVALID_WORKBOOK_MESSAGE)
        }
        WorkbookReaderError::Internal { message } => {
            error!(reason = %message, "workbook reader failed");
            Error::internal(INGEST_FAILED_MESSAGE)
        }
    }
}

fn map_parts_error(err: &PartsRepositoryError, public_message: &str) -> Error {
    error!(error = %err, "parts repository failed");
    Error::internal(public_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPartsRepository, MockWorkbookReader};
    use crate::domain::{CellValue, ErrorCode, Sheet, Workbook};
    use rstest::{fixture, rstest};

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    #[fixture]
    fn ledger() -> Workbook {
        Workbook {
            sheets: vec![
                Sheet {
                    name: "Resumen".to_owned(),
                    rows: vec![vec![text("CODIGO")], vec![text("IGNORED")]],
                },
                Sheet {
                    name: "Inventario Marzo".to_owned(),
                    rows: vec![
                        vec![text("CODIGO"), text("MARCA"), text("STOCK")],
                        vec![text("F-1"), text("Bosch"), CellValue::Integer(3)],
                        vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
                        vec![CellValue::Empty, text("NGK"), CellValue::Integer(0)],
                    ],
                },
            ],
        }
    }

    fn reader_returning(workbook: Workbook) -> MockWorkbookReader {
        let mut reader = MockWorkbookReader::new();
        reader
            .expect_read_workbook()
            .times(1)
            .return_once(move |_| Ok(workbook));
        reader
    }

    fn request(mode: IngestMode) -> IngestRequest {
        IngestRequest {
            workbook: vec![1, 2, 3],
            mode,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn append_mode_persists_accepted_rows(ledger: Workbook) {
        let mut parts = MockPartsRepository::new();
        parts
            .expect_append()
            .withf(|records| {
                records.len() == 2
                    && records.first().and_then(|r| r.code.as_deref()) == Some("F-1")
                    && records.get(1).and_then(|r| r.brand.as_deref()) == Some("NGK")
            })
            .times(1)
            .return_once(|records| Ok(records.len() as u64));
        parts.expect_replace_all().never();

        let service =
            InventoryIngestionService::new(Arc::new(reader_returning(ledger)), Arc::new(parts));
        let report = service
            .ingest(request(IngestMode::Append))
            .await
            .expect("ingestion succeeds");

        assert_eq!(
            report,
            IngestReport {
                accepted: 2,
                skipped: 1,
                mode: IngestMode::Append
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn replace_mode_replaces_even_when_nothing_is_accepted() {
        let workbook = Workbook {
            sheets: vec![Sheet {
                name: "Hoja1".to_owned(),
                rows: vec![vec![text("CODIGO")], vec![text("  ")]],
            }],
        };
        let mut parts = MockPartsRepository::new();
        parts
            .expect_replace_all()
            .withf(|records| records.is_empty())
            .times(1)
            .return_once(|_| Ok(0));
        parts.expect_append().never();

        let service =
            InventoryIngestionService::new(Arc::new(reader_returning(workbook)), Arc::new(parts));
        let report = service
            .ingest(request(IngestMode::Replace))
            .await
            .expect("ingestion succeeds");

        assert_eq!((report.accepted, report.skipped), (0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn header_row_offset_skips_title_rows() {
        let workbook = Workbook {
            sheets: vec![Sheet {
                name: "INVENTARIO".to_owned(),
                rows: vec![
                    vec![text("REPUESTOS DELTA")],
                    vec![],
                    vec![text("Marzo")],
                    vec![text("CODIGO"), text("STOCK")],
                    vec![text("A-1"), CellValue::Integer(1)],
                ],
            }],
        };
        let mut parts = MockPartsRepository::new();
        parts
            .expect_append()
            .withf(|records| records.len() == 1)
            .times(1)
            .return_once(|_| Ok(1));

        let service =
            InventoryIngestionService::new(Arc::new(reader_returning(workbook)), Arc::new(parts))
                .with_header_row_offset(3);
        let report = service
            .ingest(request(IngestMode::Append))
            .await
            .expect("ingestion succeeds");

        assert_eq!((report.accepted, report.skipped), (1, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn workbook_without_sheets_is_invalid() {
        let mut parts = MockPartsRepository::new();
        parts.expect_append().never();
        let service = InventoryIngestionService::new(
            Arc::new(reader_returning(Workbook::default())),
            Arc::new(parts),
        );

        let err = service
            .ingest(request(IngestMode::Append))
            .await
            .expect_err("empty workbook fails");

        assert_eq!(err.code(), ErrorCode::InvalidWorkbook);
        assert_eq!(err.message(), EMPTY_WORKBOOK_MESSAGE);
    }

    #[rstest]
    #[case(WorkbookReaderError::unreadable("zip header"), ErrorCode::InvalidWorkbook)]
    #[case(WorkbookReaderError::internal("join error"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn reader_errors_are_mapped(
        #[case] failure: WorkbookReaderError,
        #[case] expected: ErrorCode,
    ) {
        let mut reader = MockWorkbookReader::new();
        reader
            .expect_read_workbook()
            .return_once(move |_| Err(failure));
        let service =
            InventoryIngestionService::new(Arc::new(reader), Arc::new(MockPartsRepository::new()));

        let err = service
            .ingest(request(IngestMode::Append))
            .await
            .expect_err("reader failure propagates");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn persistence_failures_hide_the_cause(ledger: Workbook) {
        let mut parts = MockPartsRepository::new();
        parts
            .expect_append()
            .return_once(|_| Err(PartsRepositoryError::query("relation repuestos missing")));
        let service =
            InventoryIngestionService::new(Arc::new(reader_returning(ledger)), Arc::new(parts));

        let err = service
            .ingest(request(IngestMode::Append))
            .await
            .expect_err("persistence failure propagates");

        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), INGEST_FAILED_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn clear_inventory_reports_deleted_rows() {
        let mut parts = MockPartsRepository::new();
        parts.expect_clear_all().times(1).return_once(|| Ok(7));
        let service =
            InventoryIngestionService::new(Arc::new(MockWorkbookReader::new()), Arc::new(parts));

        assert_eq!(service.clear_inventory().await.expect("clear succeeds"), 7);
    }

    #[rstest]
    #[tokio::test]
    async fn clear_inventory_failure_is_internal() {
        let mut parts = MockPartsRepository::new();
        parts
            .expect_clear_all()
            .return_once(|| Err(PartsRepositoryError::connection("refused")));
        let service =
            InventoryIngestionService::new(Arc::new(MockWorkbookReader::new()), Arc::new(parts));

        let err = service.clear_inventory().await.expect_err("clear fails");
        assert_eq!(err.message(), CLEAR_FAILED_MESSAGE);
    }

    #[rstest]
    fn stage_rows_counts_rejections() {
        let rows = vec![
            RawRow::from_pairs([("CODIGO", text("A"))]),
            RawRow::from_pairs([("CODIGO", CellValue::Empty)]),
            RawRow::default(),
        ];
        let (staged, skipped) = stage_rows(&RowMapper::default(), &rows);
        assert_eq!((staged.len(), skipped), (1, 2));
    }
}
