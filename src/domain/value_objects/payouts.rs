use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One successfully released payout.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutResult {
    pub booking_id: Uuid,
    pub transaction_id: Uuid,
    pub external_transfer_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub released_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchPayoutError {
    pub booking_id: Uuid,
    pub reason: String,
}

/// Result of a provider-wide release. Individual failures never abort the
/// batch; they are reported here instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchPayoutResult {
    pub released: Vec<PayoutResult>,
    pub errors: Vec<BatchPayoutError>,
    pub total_amount_minor: i64,
    pub failed_count: usize,
}

/// Summary returned by the cron-triggered sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_amount_minor: i64,
}
