//! In-memory sharing-report store.

use crate::error::{DaoError, DaoResult};
use crate::filter::ReportFilter;
use crate::report::SharingReport;
use crate::SharingReportDao;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct StoreState {
    reports: BTreeMap<i64, SharingReport>,
    last_id: i64,
}

/// Reports are kept in creation order.
#[derive(Clone, Default)]
pub struct InMemorySharingReportStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemorySharingReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SharingReportDao for InMemorySharingReportStore {
    #[instrument(skip(self))]
    async fn find(&self, filter: &ReportFilter) -> DaoResult<Option<Vec<SharingReport>>> {
        let state = self.state.read().await;

        let page: Vec<SharingReport> = state
            .reports
            .values()
            .filter(|report| filter.matches(report))
            .skip(filter.offset())
            .take(filter.size())
            .cloned()
            .collect();

        debug!(found = page.len(), "Sharing report lookup");

        if page.is_empty() {
            Ok(None)
        } else {
            Ok(Some(page))
        }
    }

    async fn create(&self, mut report: SharingReport) -> DaoResult<i64> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        report.id = id;
        state.reports.insert(id, report);
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> DaoResult<Option<SharingReport>> {
        let state = self.state.read().await;
        Ok(state.reports.get(&id).cloned())
    }

    async fn update(&self, report: SharingReport) -> DaoResult<()> {
        let mut state = self.state.write().await;
        match state.reports.get_mut(&report.id) {
            Some(existing) => {
                *existing = report;
                Ok(())
            }
            None => Err(DaoError::NotFound(report.id)),
        }
    }

    async fn delete(&self, id: i64) -> DaoResult<()> {
        let mut state = self.state.write().await;
        state
            .reports
            .remove(&id)
            .map(|_| ())
            .ok_or(DaoError::NotFound(id))
    }

    async fn get_all(&self) -> DaoResult<Vec<SharingReport>> {
        let state = self.state.read().await;
        Ok(state.reports.values().cloned().collect())
    }
}
