// Sensor reading domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, pressure: f64, vibration: f64) -> Self {
        Self {
            timestamp,
            temperature,
            pressure,
            vibration,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Pressure => self.pressure,
            Metric::Vibration => self.vibration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Pressure,
    Vibration,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Pressure, Metric::Vibration];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Pressure => "Pressure",
            Metric::Vibration => "Vibration",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Pressure => "PSI",
            Metric::Vibration => "mm/s",
        }
    }
}

/// One value per sensor metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricSet<T> {
    pub temperature: T,
    pub pressure: T,
    pub vibration: T,
}

impl<T> MetricSet<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self {
            temperature: f(Metric::Temperature),
            pressure: f(Metric::Pressure),
            vibration: f(Metric::Vibration),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Pressure => &self.pressure,
            Metric::Vibration => &self.vibration,
        }
    }
}
