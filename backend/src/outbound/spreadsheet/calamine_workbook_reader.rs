//! `calamine`-backed workbook reader.
//!
//! Parsing is CPU bound, so it runs on tokio's blocking pool. Sheet grids are
//! re-anchored at cell A1: `calamine` trims leading empty rows from the used
//! range, but header offsets count from the first row of the sheet.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::{Span, debug};

use crate::domain::ports::{WorkbookReader, WorkbookReaderError};
use crate::domain::{CellValue, Sheet, Workbook};

/// Reads xlsx, xlsm, xlsb, xls and ods workbooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineWorkbookReader;

impl CalamineWorkbookReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkbookReader for CalamineWorkbookReader {
    async fn read_workbook(&self, bytes: Vec<u8>) -> Result<Workbook, WorkbookReaderError> {
        let span = Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| parse_workbook(bytes)))
            .await
            .map_err(|err| WorkbookReaderError::internal(format!("parser task failed: {err}")))?
    }
}

fn parse_workbook(bytes: Vec<u8>) -> Result<Workbook, WorkbookReaderError> {
    let size = bytes.len();
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| WorkbookReaderError::unreadable(err.to_string()))?;

    let mut parsed = Vec::new();
    for name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|err| WorkbookReaderError::unreadable(format!("sheet {name}: {err}")))?;
        parsed.push(Sheet {
            rows: anchored_rows(&range),
            name,
        });
    }
    debug!(size, sheets = parsed.len(), "workbook parsed");
    Ok(Workbook { sheets: parsed })
}

/// Rows of `range` with the leading empty rows and columns restored.
fn anchored_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let lead_cols = usize::try_from(first_col).unwrap_or_default();
    let lead_rows = usize::try_from(first_row).unwrap_or_default();

    let mut rows = vec![Vec::new(); lead_rows];
    rows.extend(range.rows().map(|cells| {
        std::iter::repeat_n(CellValue::Empty, lead_cols)
            .chain(cells.iter().map(to_cell_value))
            .collect()
    }));
    rows
}

fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(text.clone())
        }
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Integer(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
    }
}
