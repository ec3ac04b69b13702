pub mod mock;

use thiserror::Error;

use crate::models::{InventoryRecord, ReportRequest};

pub use mock::MockInventorySource;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("inventory source unavailable: {0}")]
    Unavailable(String),

    #[error("inventory source rejected request: {0}")]
    InvalidRequest(String),
}

/// Supplies the inventory records a report is generated from.
#[async_trait::async_trait]
pub trait InventorySource: Send + Sync {
    async fn fetch_snapshot(
        &self,
        request: &ReportRequest,
    ) -> Result<Vec<InventoryRecord>, SourceError>;

    fn name(&self) -> &str;
}
