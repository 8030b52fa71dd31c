//! Inventory part records and search keywords.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest keyword accepted by part search, in characters.
pub const MAX_KEYWORD_CHARS: usize = 100;

/// One inventory row as read from a stock ledger workbook.
///
/// `code` and `brand` are `None` when the cell was blank. Prices are `None`
/// when the cell did not hold a recognisable number, which is distinct from
/// an explicit zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartRecord {
    /// Part code, trimmed.
    pub code: Option<String>,
    /// Brand, trimmed.
    pub brand: Option<String>,
    /// Units received. Never negative.
    pub entries: i32,
    /// Units dispatched. Never negative.
    pub exits: i32,
    /// Units on hand. May be negative when the ledger is overdrawn.
    pub stock: i32,
    /// Unit price.
    pub unit_price: Option<Decimal>,
    /// Value of the stock on hand.
    pub inventory_value: Option<Decimal>,
}

impl PartRecord {
    /// Whether the record carries no identifying data and no stock.
    ///
    /// # Examples
    /// ```
    /// use inventory_backend::domain::PartRecord;
    ///
    /// assert!(PartRecord::default().is_blank());
    /// let record = PartRecord { stock: 4, ..PartRecord::default() };
    /// assert!(!record.is_blank());
    /// ```
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.code.is_none() && self.brand.is_none() && self.stock == 0
    }
}

/// A part record as persisted, with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPart {
    /// Surrogate identifier assigned by the store.
    pub id: i32,
    /// Persisted field values.
    pub part: PartRecord,
}

/// Validation errors raised by [`SearchKeyword::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchKeywordError {
    /// The keyword is empty after trimming.
    #[error("search keyword must not be empty")]
    Empty,
    /// The keyword exceeds [`MAX_KEYWORD_CHARS`].
    #[error("search keyword must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Validated, trimmed keyword used for substring search.
///
/// # Examples
/// ```
/// use inventory_backend::domain::SearchKeyword;
///
/// let keyword = SearchKeyword::new("  bosch ").expect("valid keyword");
/// assert_eq!(keyword.as_str(), "bosch");
/// assert!(SearchKeyword::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct SearchKeyword(String);

impl SearchKeyword {
    /// Trim and validate a keyword.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SearchKeywordError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SearchKeywordError::Empty);
        }
        if trimmed.chars().count() > MAX_KEYWORD_CHARS {
            return Err(SearchKeywordError::TooLong {
                max: MAX_KEYWORD_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the keyword text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive substring test used by in-memory adapters.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl TryFrom<String> for SearchKeyword {
    type Error = SearchKeywordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SearchKeyword> for String {
    fn from(value: SearchKeyword) -> Self {
        value.0
    }
}

impl std::fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
