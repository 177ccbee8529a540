use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of a settlement owed to one stakeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeholderShare {
    pub provider_id: String,
    pub share_value: f64,
}

/// Result of one revenue-sharing settlement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharingReport {
    /// Assigned by the store on create
    #[serde(default)]
    pub id: i64,
    pub aggregator_id: String,
    pub owner_provider_id: String,
    pub product_class: String,
    pub algorithm_type: String,
    pub currency: String,
    pub owner_value: f64,
    #[serde(default)]
    pub stakeholders: Vec<StakeholderShare>,
    pub last_execution: Option<DateTime<Utc>>,
    /// Whether the settlement has already been paid out
    #[serde(default)]
    pub paid: bool,
}

impl SharingReport {
    pub fn new(
        aggregator_id: impl Into<String>,
        owner_provider_id: impl Into<String>,
        product_class: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            aggregator_id: aggregator_id.into(),
            owner_provider_id: owner_provider_id.into(),
            product_class: product_class.into(),
            algorithm_type: "FIXED_PERCENTAGE".to_string(),
            currency: "EUR".to_string(),
            owner_value: 0.0,
            stakeholders: Vec::new(),
            last_execution: None,
            paid: false,
        }
    }

    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn with_owner_value(mut self, currency: impl Into<String>, value: f64) -> Self {
        self.currency = currency.into();
        self.owner_value = value;
        self
    }

    pub fn with_stakeholder(mut self, provider_id: impl Into<String>, share_value: f64) -> Self {
        self.stakeholders.push(StakeholderShare {
            provider_id: provider_id.into(),
            share_value,
        });
        self
    }
}
