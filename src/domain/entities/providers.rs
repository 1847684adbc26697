use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::providers;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = providers)]
pub struct ProviderEntity {
    pub id: Uuid,
    pub display_name: String,
    /// Connected payout account at the payment network, set during onboarding.
    pub connected_account_id: Option<String>,
    pub payout_account_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = providers)]
pub struct InsertProviderEntity {
    pub display_name: String,
    pub connected_account_id: Option<String>,
    pub payout_account_verified: bool,
}
