//! Driven port for the parts table.
//!
//! Write operations are atomic per call: either every record in the batch is
//! stored or none is. Adapters serialise writers so a replace never
//! interleaves with another load.

use async_trait::async_trait;

use crate::domain::{PartRecord, SearchKeyword, StoredPart};

use super::define_port_error;

define_port_error! {
    /// Errors raised by parts persistence adapters.
    pub enum PartsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "parts repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "parts repository query failed: {message}",
    }
}

/// Port for storing and searching inventory parts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartsRepository: Send + Sync {
    /// Insert `records` after the existing rows, in one transaction.
    ///
    /// Returns the number of rows inserted.
    async fn append(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError>;

    /// Delete every stored part and insert `records`, in one transaction.
    ///
    /// Returns the number of rows inserted.
    async fn replace_all(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError>;

    /// Delete every stored part, returning the number of rows removed.
    async fn clear_all(&self) -> Result<u64, PartsRepositoryError>;

    /// Parts whose code or brand contains `keyword` ignoring case, in
    /// insertion order.
    async fn search(&self, keyword: &SearchKeyword)
    -> Result<Vec<StoredPart>, PartsRepositoryError>;
}
