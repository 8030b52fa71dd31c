//! Format-independent model of a parsed workbook.
//!
//! Readers translate their native cell types into [`CellValue`] and lay rows
//! out on an absolute grid, so row `0` is always the first row of the sheet
//! even when the used range starts further down.

/// Sheet-name fragment identifying the stock ledger sheet.
pub const INVENTORY_SHEET_MARKER: &str = "inventario";

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Text, including dates and error markers rendered by the reader.
    Text(String),
    /// Floating-point number.
    Number(f64),
    /// Integer number.
    Integer(i64),
    /// Boolean.
    Bool(bool),
}

impl CellValue {
    /// Render the cell as trimmed text, or `None` when blank.
    ///
    /// Whole floating-point numbers render without a fractional part so a
    /// numeric code such as `1024` survives as `"1024"`.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::CellValue;
    ///
    /// assert_eq!(CellValue::Number(1024.0).as_text().as_deref(), Some("1024"));
    /// assert_eq!(CellValue::Text("  AB-1 ".into()).as_text().as_deref(), Some("AB-1"));
    /// assert_eq!(CellValue::Text("   ".into()).as_text(), None);
    /// ```
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Self::Integer(value) => Some(value.to_string()),
            Self::Number(value) => Some(render_float(*value)),
            Self::Bool(value) => Some(if *value { "TRUE" } else { "FALSE" }.to_owned()),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "guarded by the fract and range checks"
)]
fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// One sheet of a workbook on an absolute row grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Sheet name as stored in the workbook.
    pub name: String,
    /// Rows from the top of the sheet. Rows may differ in length.
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Header-keyed rows below the header row at `header_row_offset`.
    ///
    /// Header text is trimmed and columns with a blank header are dropped.
    /// Every row below the header is returned, including empty ones, so the
    /// caller can account for them. A sheet shorter than the offset yields
    /// no rows.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::{CellValue, Sheet};
    ///
    /// let sheet = Sheet {
    ///     name: "Inventario".into(),
    ///     rows: vec![
    ///         vec![CellValue::Text("CODIGO".into())],
    ///         vec![CellValue::Text("F-100".into())],
    ///     ],
    /// };
    /// let rows = sheet.records(0);
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(rows[0].get("CODIGO"), Some(&CellValue::Text("F-100".into())));
    /// ```
    #[must_use]
    pub fn records(&self, header_row_offset: usize) -> Vec<RawRow> {
        let mut rows = self.rows.iter().skip(header_row_offset);
        let Some(header) = rows.next() else {
            return Vec::new();
        };
        let columns: Vec<(usize, String)> = header
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.as_text().map(|name| (index, name)))
            .collect();

        rows.map(|row| RawRow {
            cells: columns
                .iter()
                .map(|(index, name)| {
                    let value = row.get(*index).cloned().unwrap_or_default();
                    (name.clone(), value)
                })
                .collect(),
        })
        .collect()
    }
}

/// A parsed workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// The sheet holding the stock ledger.
    ///
    /// Prefers the first sheet whose name contains
    /// [`INVENTORY_SHEET_MARKER`] ignoring case, then falls back to the first
    /// sheet. Returns `None` for a workbook without sheets.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::{Sheet, Workbook};
    ///
    /// let workbook = Workbook {
    ///     sheets: vec![
    ///         Sheet { name: "Resumen".into(), rows: vec![] },
    ///         Sheet { name: "INVENTARIO 2024".into(), rows: vec![] },
    ///     ],
    /// };
    /// let selected = workbook.select_inventory_sheet().expect("has sheets");
    /// assert_eq!(selected.name, "INVENTARIO 2024");
    /// ```
    #[must_use]
    pub fn select_inventory_sheet(&self) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name.to_lowercase().contains(INVENTORY_SHEET_MARKER))
            .or_else(|| self.sheets.first())
    }
}

/// One data row keyed by header text, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    /// `(header, value)` pairs. Headers may repeat.
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    /// Build a row from `(header, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, CellValue)>,
        S: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(header, value)| (header.into(), value))
                .collect(),
        }
    }

    /// First value whose header equals `header` exactly.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }
}
