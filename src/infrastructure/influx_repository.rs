// InfluxDB repository implementation
use crate::application::reading_repository::ReadingRepository;
use crate::domain::asset::{Asset, Prediction};
use crate::domain::reading::Reading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const ASSET_FIELDS: &str = "LAST(\"name\") AS \"name\", LAST(location) AS location, \
     LAST(manufacturer) AS manufacturer, LAST(model) AS model";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    tags: Option<HashMap<String, String>>,
}

impl InfluxQLResponse {
    fn series(&self) -> impl Iterator<Item = &InfluxQLSeries> {
        self.results
            .first()
            .and_then(|r| r.series.as_ref())
            .into_iter()
            .flatten()
    }
}

impl InfluxQLSeries {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn text(&self, row: &[serde_json::Value], name: &str) -> Option<String> {
        self.column(name)
            .and_then(|idx| row.get(idx))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    fn number(&self, row: &[serde_json::Value], name: &str) -> Option<f64> {
        self.column(name)
            .and_then(|idx| row.get(idx))
            .and_then(|v| v.as_f64())
    }

    fn time(&self, row: &[serde_json::Value]) -> Option<DateTime<Utc>> {
        let raw = self.text(row, "time")?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Escape a value for use inside a single-quoted InfluxQL string literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

// Queries are assembled in one pass so asset ids are never re-scanned for placeholders.
fn assets_query(asset_id: Option<&str>) -> String {
    match asset_id {
        Some(id) => format!(
            "SELECT {} FROM assets WHERE asset_id = '{}' GROUP BY asset_id",
            ASSET_FIELDS,
            escape_literal(id)
        ),
        None => format!("SELECT {} FROM assets GROUP BY asset_id", ASSET_FIELDS),
    }
}

fn readings_query(asset_id: &str, limit: usize) -> String {
    format!(
        "SELECT temperature, pressure, vibration FROM sensor_readings \
         WHERE asset_id = '{}' ORDER BY time DESC LIMIT {}",
        escape_literal(asset_id),
        limit
    )
}

fn prediction_query(asset_id: &str) -> String {
    format!(
        "SELECT probability, risk_level, model_version FROM predictions \
         WHERE asset_id = '{}' ORDER BY time DESC LIMIT 1",
        escape_literal(asset_id)
    )
}

impl InfluxRepository {
    pub fn new(host: String, token: String, database: String, retention_policy: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
            retention_policy,
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);
        tracing::debug!("Executing InfluxQL query: {}", query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        check_errors(data)
    }

    async fn query_assets(&self, asset_id: Option<&str>) -> Result<Vec<Asset>> {
        let response = self.execute_query(&assets_query(asset_id)).await?;
        Ok(parse_assets(&response))
    }
}

fn check_errors(data: InfluxQLResponse) -> Result<InfluxQLResponse> {
    if let Some(error) = data.results.first().and_then(|r| r.error.as_ref()) {
        anyhow::bail!("InfluxDB query error: {}", error);
    }
    Ok(data)
}

fn parse_assets(response: &InfluxQLResponse) -> Vec<Asset> {
    let mut assets = Vec::new();

    for series in response.series() {
        let Some(asset_id) = series.tags.as_ref().and_then(|t| t.get("asset_id")) else {
            tracing::warn!("Skipping asset series without asset_id tag");
            continue;
        };
        let row = series.values.first().map(Vec::as_slice).unwrap_or_default();

        let mut asset = Asset::new(asset_id.clone(), series.text(row, "name"));
        asset.location = series.text(row, "location");
        asset.manufacturer = series.text(row, "manufacturer");
        asset.model = series.text(row, "model");
        assets.push(asset);
    }

    assets
}

fn parse_readings(response: &InfluxQLResponse) -> Vec<Reading> {
    let mut readings = Vec::new();

    for series in response.series() {
        for row in &series.values {
            let parsed = series.time(row).and_then(|timestamp| {
                Some(Reading::new(
                    timestamp,
                    series.number(row, "temperature")?,
                    series.number(row, "pressure")?,
                    series.number(row, "vibration")?,
                ))
            });

            match parsed {
                Some(reading) => readings.push(reading),
                None => tracing::warn!("Skipping malformed reading row: {:?}", row),
            }
        }
    }

    readings
}

fn parse_prediction(response: &InfluxQLResponse) -> Option<Prediction> {
    let series = response.series().next()?;
    let row = series.values.first()?;

    Some(Prediction {
        probability: series.number(row, "probability")?,
        risk_level: series.text(row, "risk_level")?,
        model_version: series.text(row, "model_version").unwrap_or_default(),
        predicted_at: series.time(row)?,
    })
}

#[async_trait]
impl ReadingRepository for InfluxRepository {
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let assets = self.query_assets(None).await?;
        tracing::debug!("Found {} assets", assets.len());
        Ok(assets)
    }

    async fn get_asset(&self, asset_id: &str) -> Result<Option<Asset>> {
        let assets = self.query_assets(Some(asset_id)).await?;
        Ok(assets.into_iter().find(|a| a.id == asset_id))
    }

    async fn recent_readings(&self, asset_id: &str, limit: usize) -> Result<Vec<Reading>> {
        let response = self.execute_query(&readings_query(asset_id, limit)).await?;
        let readings = parse_readings(&response);

        tracing::debug!("Fetched {} readings for asset {}", readings.len(), asset_id);
        Ok(readings)
    }

    async fn latest_prediction(&self, asset_id: &str) -> Result<Option<Prediction>> {
        let response = self.execute_query(&prediction_query(asset_id)).await?;
        Ok(parse_prediction(&response))
    }
}
