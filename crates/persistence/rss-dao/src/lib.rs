//! Sharing-report persistence.
//!
//! [`SharingReportDao`] is the lookup contract the settlement services use;
//! [`InMemorySharingReportStore`] backs it with a process-local map.

mod error;
mod filter;
mod memory;
mod report;

pub use error::{DaoError, DaoResult};
pub use filter::ReportFilter;
pub use memory::InMemorySharingReportStore;
pub use report::{SharingReport, StakeholderShare};

use async_trait::async_trait;

/// Storage access for sharing reports
#[async_trait]
pub trait SharingReportDao: Send + Sync {
    /// Reports matching `filter`, or `None` when nothing matches.
    ///
    /// "Not found" is never an error; only storage failures are.
    async fn find(&self, filter: &ReportFilter) -> DaoResult<Option<Vec<SharingReport>>>;

    /// Store a new report, returning its assigned id
    async fn create(&self, report: SharingReport) -> DaoResult<i64>;

    async fn get_by_id(&self, id: i64) -> DaoResult<Option<SharingReport>>;

    async fn update(&self, report: SharingReport) -> DaoResult<()>;

    async fn delete(&self, id: i64) -> DaoResult<()>;

    async fn get_all(&self) -> DaoResult<Vec<SharingReport>>;
}
