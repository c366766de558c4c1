use crate::domain::entities::Country;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<Country>>;
}
