// HTTP request handlers
use crate::application::error::TrendServiceError;
use crate::domain::asset::Asset;
use crate::domain::reading::Reading;
use crate::domain::time_range::TimeRange;
use crate::domain::trend::{Chunk, HalfToHalf};
use crate::infrastructure::http_response::{accepts_brotli, csv_attachment, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub hours: Option<u32>,
}

impl RangeQuery {
    fn resolve(&self, default_hours: u32) -> Result<TimeRange, ApiError> {
        let hours = self.hours.unwrap_or(default_hours);
        TimeRange::supported(hours).ok_or(ApiError::UnsupportedRange(hours))
    }
}

#[derive(Serialize)]
pub struct TrendsResponse<'a> {
    pub asset: &'a Asset,
    pub hours: u32,
    pub chunk_size_minutes: usize,
    pub chunk_unit: &'static str,
    pub reading_count: usize,
    pub latest: Option<&'a Reading>,
    pub half_to_half: &'a HalfToHalf,
    /// Most recent period first, for tables.
    pub chunks: &'a [Chunk],
    /// Oldest period first, for charts.
    pub chart_chunks: Vec<&'a Chunk>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all assets
pub async fn list_assets(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, ApiError> {
    let assets = state
        .trend_service
        .list_assets()
        .await
        .map_err(TrendServiceError::Storage)?;

    Ok(json_response(&assets, accepts_brotli(&headers)).await?)
}

/// Half-to-half and per-period trend statistics for one asset
pub async fn asset_trends(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, ApiError> {
    let range = query.resolve(state.default_hours)?;
    let trends = state.trend_service.analyze_asset(&id, range).await?;
    let analysis = &trends.analysis;

    let body = TrendsResponse {
        asset: &trends.asset,
        hours: range.hours(),
        chunk_size_minutes: analysis.chunk_config.size_minutes,
        chunk_unit: analysis.chunk_config.unit,
        reading_count: analysis.reading_count,
        latest: analysis.latest.as_ref(),
        half_to_half: &analysis.half_to_half,
        chunks: &analysis.chunks,
        chart_chunks: analysis.chart_chunks(),
    };

    Ok(json_response(&body, accepts_brotli(&headers)).await?)
}

/// Download the CSV trend report for one asset
pub async fn asset_report(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, ApiError> {
    let range = query.resolve(state.default_hours)?;
    let report = state
        .trend_service
        .build_report(&id, range, Utc::now())
        .await?;

    tracing::info!("Exporting report {} ({} bytes)", report.filename, report.body.len());
    Ok(csv_attachment(&report.filename, report.body)?)
}
