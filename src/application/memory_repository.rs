// In-memory repository used by service and handler tests
use crate::application::reading_repository::ReadingRepository;
use crate::domain::asset::{Asset, Prediction};
use crate::domain::reading::Reading;
use async_trait::async_trait;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct AssetRecord {
    asset: Option<Asset>,
    readings: Vec<Reading>,
    prediction: Option<Prediction>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: BTreeMap<String, AssetRecord>,
    unavailable: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails, as if the backing store were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        let id = asset.id.clone();
        self.records.entry(id).or_default().asset = Some(asset);
        self
    }

    /// Readings may be given in any order; they are served newest first.
    pub fn with_readings(mut self, asset_id: &str, readings: Vec<Reading>) -> Self {
        self.records.entry(asset_id.to_string()).or_default().readings = readings;
        self
    }

    pub fn with_prediction(mut self, asset_id: &str, prediction: Prediction) -> Self {
        self.records.entry(asset_id.to_string()).or_default().prediction = Some(prediction);
        self
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.unavailable {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingRepository for MemoryRepository {
    async fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        self.check()?;
        Ok(self.records.values().filter_map(|r| r.asset.clone()).collect())
    }

    async fn get_asset(&self, asset_id: &str) -> anyhow::Result<Option<Asset>> {
        self.check()?;
        Ok(self.records.get(asset_id).and_then(|r| r.asset.clone()))
    }

    async fn recent_readings(&self, asset_id: &str, limit: usize) -> anyhow::Result<Vec<Reading>> {
        self.check()?;
        let mut readings = self
            .records
            .get(asset_id)
            .map(|r| r.readings.clone())
            .unwrap_or_default();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings.truncate(limit);
        Ok(readings)
    }

    async fn latest_prediction(&self, asset_id: &str) -> anyhow::Result<Option<Prediction>> {
        self.check()?;
        Ok(self.records.get(asset_id).and_then(|r| r.prediction.clone()))
    }
}

/// `n` one-minute readings ending at 2024-03-01T12:00Z.
/// Temperature rises by 1 per minute from 100.
pub fn minute_readings(n: usize) -> Vec<Reading> {
    use chrono::{Duration, TimeZone, Utc};

    let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let minutes_before_end = (n - 1 - i) as i64;
            Reading::new(
                end - Duration::minutes(minutes_before_end),
                100.0 + i as f64,
                30.0,
                0.8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_merges_records_per_asset() {
        let repo = MemoryRepository::new()
            .with_readings("m-1", minute_readings(3))
            .with_asset(Asset::new("m-1".to_string(), Some("Mixer".to_string())));

        let asset = repo.get_asset("m-1").await.unwrap().unwrap();
        assert_eq!(asset.name, "Mixer");

        let readings = repo.recent_readings("m-1", 2).await.unwrap();
        assert_eq!(readings.len(), 2);
        assert!(readings[0].timestamp > readings[1].timestamp);
    }
}
