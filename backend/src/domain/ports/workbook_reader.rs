//! Driven port turning uploaded bytes into a [`Workbook`].

use async_trait::async_trait;

use crate::domain::Workbook;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading a workbook.
    pub enum WorkbookReaderError {
        /// The bytes are not a workbook in any supported format.
        Unreadable { message: String } =>
            "workbook could not be read: {message}",
        /// The reader failed for reasons unrelated to the input.
        Internal { message: String } =>
            "workbook reader failed: {message}",
    }
}

/// Port for parsing spreadsheet uploads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkbookReader: Send + Sync {
    /// Parse `bytes` into a format-independent workbook.
    async fn read_workbook(&self, bytes: Vec<u8>) -> Result<Workbook, WorkbookReaderError>;
}
