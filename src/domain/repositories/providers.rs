use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::providers::ProviderEntity;

#[async_trait]
#[automock]
pub trait ProviderRepository {
    async fn find_by_id(&self, provider_id: Uuid) -> Result<Option<ProviderEntity>>;
}
