//! Query parameters for sharing-report lookups.

use crate::error::{DaoError, DaoResult};
use crate::report::SharingReport;

/// Default page size when none is given
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub aggregator_id: Option<String>,
    pub provider_id: Option<String>,
    pub product_class: Option<String>,
    /// Include reports that were already paid
    pub all: bool,
    offset: usize,
    size: usize,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            aggregator_id: None,
            provider_id: None,
            product_class: None,
            all: false,
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregator(mut self, aggregator_id: impl Into<String>) -> Self {
        self.aggregator_id = Some(aggregator_id.into());
        self
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    pub fn with_product_class(mut self, product_class: impl Into<String>) -> Self {
        self.product_class = Some(product_class.into());
        self
    }

    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Page window; `size` must be positive.
    pub fn with_page(mut self, offset: usize, size: usize) -> DaoResult<Self> {
        if size == 0 {
            return Err(DaoError::InvalidPagination(
                "page size must be greater than 0".to_string(),
            ));
        }
        self.offset = offset;
        self.size = size;
        Ok(self)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn matches(&self, report: &SharingReport) -> bool {
        fn field_matches(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().is_none_or(|expected| expected == actual)
        }

        field_matches(&self.aggregator_id, &report.aggregator_id)
            && field_matches(&self.provider_id, &report.owner_provider_id)
            && field_matches(&self.product_class, &report.product_class)
            && (self.all || !report.paid)
    }
}
