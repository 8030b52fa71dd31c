//! Maps header-keyed workbook rows onto [`PartRecord`]s.
//!
//! Column names have drifted between ledger layouts, so the mapping is driven
//! by an alias table rather than fixed header strings. The mapper is pure: it
//! performs no I/O and never fails, it only accepts or rejects a row.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellValue, PartRecord, RawRow, normalize_decimal, parse_count};

/// Canonical part fields a workbook column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Part code.
    Code,
    /// Brand.
    Brand,
    /// Units received.
    Entries,
    /// Units dispatched.
    Exits,
    /// Units on hand.
    Stock,
    /// Unit price.
    UnitPrice,
    /// Value of the stock on hand.
    InventoryValue,
}

/// Alias table from header text to canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAliases {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl HeaderAliases {
    /// Build a table from `(field, aliases)` pairs. Earlier aliases win when
    /// a row carries more than one of them.
    pub fn new<I, A, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalField, A)>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(field, aliases)| (field, aliases.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Current stock ledger layout.
    #[must_use]
    pub fn stock_ledger() -> Self {
        Self::new([
            (CanonicalField::Code, vec!["CODIGO", "CÓDIGO"]),
            (CanonicalField::Brand, vec!["MARCA"]),
            (CanonicalField::Entries, vec!["ENTRADAS"]),
            (CanonicalField::Exits, vec!["SALIDAS"]),
            (CanonicalField::Stock, vec!["STOCK"]),
            (
                CanonicalField::UnitPrice,
                vec!["PRECIOS", "PRECIO", "PRECIO UNITARIO"],
            ),
            (
                CanonicalField::InventoryValue,
                vec!["IMPORTE_INVENTARIO", "IMPORTE INVENTARIO"],
            ),
        ])
    }

    /// Older catalogue layout with lowercase headers. Only code and brand
    /// carry over; its category, model, and description columns are ignored.
    #[must_use]
    pub fn legacy_catalogue() -> Self {
        Self::new([
            (CanonicalField::Code, vec!["codigo"]),
            (CanonicalField::Brand, vec!["marca"]),
        ])
    }

    /// Aliases declared for `field`.
    #[must_use]
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or_default()
    }
}

impl Default for HeaderAliases {
    fn default() -> Self {
        Self::stock_ledger()
    }
}

/// Named alias tables selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnProfile {
    /// [`HeaderAliases::stock_ledger`].
    #[default]
    StockLedger,
    /// [`HeaderAliases::legacy_catalogue`].
    LegacyCatalogue,
}

impl ColumnProfile {
    /// Alias table for this profile.
    #[must_use]
    pub fn aliases(self) -> HeaderAliases {
        match self {
            Self::StockLedger => HeaderAliases::stock_ledger(),
            Self::LegacyCatalogue => HeaderAliases::legacy_catalogue(),
        }
    }
}

/// Error returned when parsing an unknown configuration keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownKeywordError {
    kind: &'static str,
    value: String,
}

impl UnknownKeywordError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl FromStr for ColumnProfile {
    type Err = UnknownKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stock_ledger" => Ok(Self::StockLedger),
            "legacy_catalogue" => Ok(Self::LegacyCatalogue),
            other => Err(UnknownKeywordError::new("column profile", other)),
        }
    }
}

/// How header text is compared with aliases. Surrounding whitespace is
/// ignored either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatching {
    /// Byte-for-byte comparison.
    #[default]
    Exact,
    /// Comparison after lower-casing both sides.
    CaseInsensitive,
}

impl HeaderMatching {
    fn matches(self, header: &str, alias: &str) -> bool {
        let header = header.trim();
        match self {
            Self::Exact => header == alias,
            Self::CaseInsensitive => header.to_lowercase() == alias.to_lowercase(),
        }
    }
}

impl FromStr for HeaderMatching {
    type Err = UnknownKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "exact" => Ok(Self::Exact),
            "case_insensitive" => Ok(Self::CaseInsensitive),
            other => Err(UnknownKeywordError::new("header matching mode", other)),
        }
    }
}

/// Outcome of mapping one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedRow {
    /// The row yields a record to persist.
    Accepted(PartRecord),
    /// The row is blank and should be counted as skipped.
    Rejected,
}

/// Pure row-to-record mapper.
///
/// # Examples
/// ```
/// use inventory_backend::domain::{CellValue, MappedRow, RawRow, RowMapper};
///
/// let mapper = RowMapper::default();
/// let row = RawRow::from_pairs([
///     ("CODIGO", CellValue::Text(" F-100 ".into())),
///     ("STOCK", CellValue::Integer(3)),
/// ]);
/// let MappedRow::Accepted(record) = mapper.map(&row) else {
///     panic!("row should be accepted");
/// };
/// assert_eq!(record.code.as_deref(), Some("F-100"));
/// assert_eq!(record.stock, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMapper {
    aliases: HeaderAliases,
    matching: HeaderMatching,
}

impl RowMapper {
    /// Create a mapper from an alias table and matching mode.
    #[must_use]
    pub fn new(aliases: HeaderAliases, matching: HeaderMatching) -> Self {
        Self { aliases, matching }
    }

    /// Header matching mode in use.
    #[must_use]
    pub fn matching(&self) -> HeaderMatching {
        self.matching
    }

    /// Map a row to a record, rejecting blank rows.
    #[must_use]
    pub fn map(&self, row: &RawRow) -> MappedRow {
        let record = PartRecord {
            code: self.cell(row, CanonicalField::Code).and_then(CellValue::as_text),
            brand: self.cell(row, CanonicalField::Brand).and_then(CellValue::as_text),
            entries: self.count(row, CanonicalField::Entries).max(0),
            exits: self.count(row, CanonicalField::Exits).max(0),
            stock: self.count(row, CanonicalField::Stock),
            unit_price: self
                .cell(row, CanonicalField::UnitPrice)
                .and_then(normalize_decimal),
            inventory_value: self
                .cell(row, CanonicalField::InventoryValue)
                .and_then(normalize_decimal),
        };
        if record.is_blank() {
            MappedRow::Rejected
        } else {
            MappedRow::Accepted(record)
        }
    }

    fn count(&self, row: &RawRow, field: CanonicalField) -> i32 {
        self.cell(row, field).map_or(0, parse_count)
    }

    /// First cell whose header matches any alias of `field`, scanning
    /// aliases in declaration order and columns left to right.
    fn cell<'row>(&self, row: &'row RawRow, field: CanonicalField) -> Option<&'row CellValue> {
        self.aliases.aliases(field).iter().find_map(|alias| {
            row.cells
                .iter()
                .find(|(header, _)| self.matching.matches(header, alias))
                .map(|(_, value)| value)
        })
    }
}
