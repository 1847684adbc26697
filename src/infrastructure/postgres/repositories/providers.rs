use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use uuid::Uuid;

use crate::domain::entities::providers::ProviderEntity;
use crate::domain::repositories::providers::ProviderRepository;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;
use crate::infrastructure::postgres::schema::providers;

pub struct ProviderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProviderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProviderRepository for ProviderPostgres {
    async fn find_by_id(&self, provider_id: Uuid) -> Result<Option<ProviderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = providers::table
            .find(provider_id)
            .select(ProviderEntity::as_select())
            .first::<ProviderEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
