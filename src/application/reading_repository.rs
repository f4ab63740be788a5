// Repository trait for asset and sensor reading access
use crate::domain::asset::{Asset, Prediction};
use crate::domain::reading::Reading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// List all known assets
    async fn list_assets(&self) -> anyhow::Result<Vec<Asset>>;

    /// Fetch one asset's metadata
    async fn get_asset(&self, asset_id: &str) -> anyhow::Result<Option<Asset>>;

    /// Most recent readings for an asset, newest first, at most `limit` of them
    async fn recent_readings(&self, asset_id: &str, limit: usize) -> anyhow::Result<Vec<Reading>>;

    /// Latest stored failure prediction, if any
    async fn latest_prediction(&self, asset_id: &str) -> anyhow::Result<Option<Prediction>>;
}
