use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::processed_webhook_events;

/// Existence of a row means the event must never be reprocessed.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = processed_webhook_events)]
#[diesel(primary_key(external_event_id))]
pub struct ProcessedWebhookEventEntity {
    pub external_event_id: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = processed_webhook_events)]
pub struct InsertProcessedWebhookEventEntity {
    pub external_event_id: String,
    pub processed_at: DateTime<Utc>,
}
