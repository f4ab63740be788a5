// Trend service - Use cases for per-asset trend analysis and report export
use crate::application::error::TrendServiceError;
use crate::application::reading_repository::ReadingRepository;
use crate::domain::asset::Asset;
use crate::domain::time_range::TimeRange;
use crate::domain::trend::TrendAnalysis;
use crate::infrastructure::report_csv::{write_report, ReportContext};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AssetTrends {
    pub asset: Asset,
    pub analysis: TrendAnalysis,
}

#[derive(Debug, Clone)]
pub struct TrendReport {
    pub filename: String,
    pub body: String,
}

#[derive(Clone)]
pub struct TrendService {
    repository: Arc<dyn ReadingRepository>,
}

impl TrendService {
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        self.repository.list_assets().await
    }

    pub async fn analyze_asset(
        &self,
        asset_id: &str,
        range: TimeRange,
    ) -> Result<AssetTrends, TrendServiceError> {
        let asset = self
            .repository
            .get_asset(asset_id)
            .await?
            .ok_or_else(|| TrendServiceError::AssetNotFound(asset_id.to_string()))?;

        // Storage hands back newest first; the engine wants oldest first.
        let budget = range.reading_budget();
        let mut readings = self.repository.recent_readings(asset_id, budget).await?;
        readings.truncate(budget);
        readings.reverse();

        tracing::debug!(
            "Analyzing {} readings for {} over {}h",
            readings.len(),
            asset_id,
            range.hours()
        );

        Ok(AssetTrends {
            asset,
            analysis: TrendAnalysis::analyze(&readings, range),
        })
    }

    pub async fn build_report(
        &self,
        asset_id: &str,
        range: TimeRange,
        generated_at: DateTime<Utc>,
    ) -> Result<TrendReport, TrendServiceError> {
        let trends = self.analyze_asset(asset_id, range).await?;
        let prediction = self.repository.latest_prediction(asset_id).await?;

        let body = write_report(&ReportContext {
            asset: &trends.asset,
            analysis: &trends.analysis,
            prediction: prediction.as_ref(),
            generated_at,
        })?;

        Ok(TrendReport {
            filename: trends
                .asset
                .report_filename(range.hours(), generated_at.date_naive()),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::memory_repository::{minute_readings, MemoryRepository};
    use crate::domain::asset::Prediction;
    use chrono::TimeZone;

    fn service(repository: MemoryRepository) -> TrendService {
        TrendService::new(Arc::new(repository))
    }

    fn compressor() -> Asset {
        Asset::new("c-1".to_string(), Some("Air Compressor".to_string()))
    }

    #[tokio::test]
    async fn test_analyze_reverses_storage_order() {
        let repo = MemoryRepository::new()
            .with_asset(compressor())
            .with_readings("c-1", minute_readings(60));

        let trends = service(repo).analyze_asset("c-1", TimeRange::new(1)).await.unwrap();

        let analysis = &trends.analysis;
        assert_eq!(analysis.reading_count, 60);
        assert_eq!(analysis.chunks.len(), 4);
        assert_eq!(analysis.chunks[0].label, "Last 15min");
        assert_eq!(analysis.chunks[0].mean.temperature, 152.0);
        assert_eq!(analysis.latest.as_ref().map(|r| r.temperature), Some(159.0));
    }

    #[tokio::test]
    async fn test_analyze_bounds_readings_to_budget() {
        let repo = MemoryRepository::new()
            .with_asset(compressor())
            .with_readings("c-1", minute_readings(300));

        let trends = service(repo).analyze_asset("c-1", TimeRange::new(4)).await.unwrap();

        assert_eq!(trends.analysis.reading_count, 240);
        // The newest 240 readings start at temperature 160.
        assert_eq!(trends.analysis.half_to_half.first_half.temperature.min, Some(160.0));
    }

    #[tokio::test]
    async fn test_analyze_unknown_asset() {
        let err = service(MemoryRepository::new())
            .analyze_asset("ghost", TimeRange::new(8))
            .await
            .unwrap_err();
        assert!(matches!(err, TrendServiceError::AssetNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_analyze_storage_failure() {
        let err = service(MemoryRepository::unavailable())
            .analyze_asset("c-1", TimeRange::new(8))
            .await
            .unwrap_err();
        assert!(matches!(err, TrendServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn test_build_report() {
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap();
        let repo = MemoryRepository::new()
            .with_asset(compressor())
            .with_readings("c-1", minute_readings(1440))
            .with_prediction(
                "c-1",
                Prediction {
                    probability: 0.275,
                    risk_level: "medium".to_string(),
                    model_version: "rf-0.3".to_string(),
                    predicted_at: generated_at,
                },
            );

        let report = service(repo)
            .build_report("c-1", TimeRange::new(24), generated_at)
            .await
            .unwrap();

        assert_eq!(report.filename, "Air_Compressor_24h_report_2024-03-01.csv");
        assert!(report.body.contains("\"Last 3hr\""));
        assert!(report.body.contains("\"rf-0.3\""));
    }
}
