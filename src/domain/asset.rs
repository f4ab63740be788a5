// Asset and prediction domain models
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

impl Asset {
    pub fn new(id: String, name: Option<String>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Self {
            id,
            name,
            location: None,
            manufacturer: None,
            model: None,
        }
    }

    /// File name for a downloaded report, e.g. `Pump_A_24h_report_2024-03-01.csv`.
    ///
    /// Whitespace, quotes, path separators and control characters become `_`.
    pub fn report_filename(&self, hours: u32, date: NaiveDate) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| match c {
                ' ' | '"' | '/' | '\\' => '_',
                c if c.is_control() || c.is_whitespace() => '_',
                c => c,
            })
            .collect();
        format!("{}_{}h_report_{}.csv", name, hours, date.format("%Y-%m-%d"))
    }
}

/// Latest failure prediction stored for an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub risk_level: String,
    pub model_version: String,
    pub predicted_at: DateTime<Utc>,
}
