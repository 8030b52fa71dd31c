//! Driving port for loading stock workbooks into the parts table.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UnknownKeywordError};

/// How an ingestion run treats rows already stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// Add the new rows after the existing ones.
    #[default]
    Append,
    /// Delete existing rows and load the new ones in the same transaction.
    Replace,
}

impl IngestMode {
    /// Lower-case keyword for logs and responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
        }
    }
}

impl std::fmt::Display for IngestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestMode {
    type Err = UnknownKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(UnknownKeywordError::new("ingest mode", other)),
        }
    }
}

/// One ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    /// Raw workbook bytes as uploaded.
    pub workbook: Vec<u8>,
    /// Treatment of existing rows.
    pub mode: IngestMode,
}

/// Row counts from one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows mapped to parts and persisted.
    pub accepted: usize,
    /// Blank rows that were dropped.
    pub skipped: usize,
    /// Mode the run used.
    pub mode: IngestMode,
}

/// Driving port for inventory ingestion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryIngestionCommand: Send + Sync {
    /// Parse the workbook and persist its non-blank rows.
    async fn ingest(&self, request: IngestRequest) -> Result<IngestReport, Error>;

    /// Delete every stored part, returning how many were removed.
    async fn clear_inventory(&self) -> Result<u64, Error>;
}

/// Fixture command that accepts nothing and clears nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureInventoryIngestionCommand;

#[async_trait]
impl InventoryIngestionCommand for FixtureInventoryIngestionCommand {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestReport, Error> {
        Ok(IngestReport {
            accepted: 0,
            skipped: 0,
            mode: request.mode,
        })
    }

    async fn clear_inventory(&self) -> Result<u64, Error> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("append", Ok(IngestMode::Append))]
    #[case(" replace ", Ok(IngestMode::Replace))]
    #[case("REPLACE", Err(UnknownKeywordError::new("ingest mode", "REPLACE")))]
    fn parses_modes(#[case] raw: &str, #[case] expected: Result<IngestMode, UnknownKeywordError>) {
        assert_eq!(raw.parse::<IngestMode>(), expected);
    }

    #[rstest]
    fn serialises_as_lowercase_keyword() {
        let json = serde_json::to_string(&IngestMode::Replace).expect("serialise mode");
        assert_eq!(json, "\"replace\"");
    }
}
