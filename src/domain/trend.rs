// Trend analysis engine - half-to-half comparison and adaptive chunking
//
// Everything here is pure: the same readings and range always produce the
// same analysis. "Not available" is modelled as `None`, never as zero.
use super::reading::{Metric, MetricSet, Reading};
use super::time_range::{ChunkConfig, TimeRange};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from `first` to `last`, rounded to two decimals.
///
/// A zero `first` has no meaningful ratio and yields `None`.
pub fn rate_of_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    Some(round2((last - first) / first * 100.0))
}

fn change_between(first: Option<f64>, second: Option<f64>) -> Option<f64> {
    rate_of_change(first?, second?)
}

/// Mean, maximum and minimum of one metric over a set of readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Aggregate {
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl Aggregate {
    fn over(readings: &[Reading], metric: Metric) -> Self {
        if readings.is_empty() {
            return Self::default();
        }

        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for value in readings.iter().map(|r| r.value(metric)) {
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }

        Self {
            mean: Some(sum / readings.len() as f64),
            max: Some(max),
            min: Some(min),
        }
    }

    fn change(first: &Aggregate, second: &Aggregate) -> Self {
        Self {
            mean: change_between(first.mean, second.mean),
            max: change_between(first.max, second.max),
            min: change_between(first.min, second.min),
        }
    }
}

pub type HalfMetrics = MetricSet<Aggregate>;

/// Older half vs newer half of the selected window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfToHalf {
    pub first_half_count: usize,
    pub second_half_count: usize,
    pub first_half: HalfMetrics,
    pub second_half: HalfMetrics,
    /// Percentage change of each aggregate, first half to second half.
    pub rate_of_change: MetricSet<Aggregate>,
}

pub fn half_to_half(readings: &[Reading]) -> HalfToHalf {
    let midpoint = readings.len() / 2;
    let (older, newer) = readings.split_at(midpoint);

    let first_half = MetricSet::from_fn(|m| Aggregate::over(older, m));
    let second_half = MetricSet::from_fn(|m| Aggregate::over(newer, m));
    let rate_of_change =
        MetricSet::from_fn(|m| Aggregate::change(first_half.get(m), second_half.get(m)));

    HalfToHalf {
        first_half_count: older.len(),
        second_half_count: newer.len(),
        first_half,
        second_half,
        rate_of_change,
    }
}

/// One aggregated period of the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// Generation index, 0 = oldest period.
    pub index: usize,
    pub label: String,
    pub reading_count: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub mean: MetricSet<f64>,
    pub rate_of_change: MetricSet<Option<f64>>,
}

/// Split chronological readings into fixed-size periods.
///
/// Returned most recent first. Reverse the result for oldest-first order.
pub fn chunk_readings(readings: &[Reading], range: TimeRange) -> Vec<Chunk> {
    let config = range.chunk_config();
    let num_chunks = readings.len().div_ceil(config.size_minutes);

    let mut chunks: Vec<Chunk> = readings
        .chunks(config.size_minutes)
        .enumerate()
        .map(|(index, slice)| build_chunk(index, slice, num_chunks, range, config))
        .collect();

    chunks.reverse();
    chunks
}

fn build_chunk(
    index: usize,
    slice: &[Reading],
    num_chunks: usize,
    range: TimeRange,
    config: ChunkConfig,
) -> Chunk {
    let first = &slice[0];
    let last = &slice[slice.len() - 1];
    let count = slice.len() as f64;

    let mean =
        MetricSet::from_fn(|m| round2(slice.iter().map(|r| r.value(m)).sum::<f64>() / count));
    let change = MetricSet::from_fn(|m| {
        if slice.len() < 2 {
            Some(0.0)
        } else {
            rate_of_change(first.value(m), last.value(m))
        }
    });

    Chunk {
        index,
        label: period_label(index, num_chunks, range, config),
        reading_count: slice.len(),
        start: first.timestamp,
        end: last.timestamp,
        mean,
        rate_of_change: change,
    }
}

/// Label a period by how far before the end of the window it lies.
fn period_label(index: usize, num_chunks: usize, range: TimeRange, config: ChunkConfig) -> String {
    let periods_after_end = num_chunks - index - 1;
    let periods_after_start = num_chunks - index;
    let hours_ago_end = periods_after_end * config.size_minutes / 60;
    let hours_ago_start = periods_after_start * config.size_minutes / 60;

    if hours_ago_end == 0 {
        format!("Last {}", config.unit)
    } else if range.hours() == 1 {
        let mins_ago_end = periods_after_end * config.size_minutes;
        let mins_ago_start = periods_after_start * config.size_minutes;
        format!("{}-{} mins ago", mins_ago_start, mins_ago_end)
    } else if hours_ago_start == hours_ago_end {
        format!("{}hr ago", hours_ago_end)
    } else {
        format!("{}-{}hrs ago", hours_ago_start, hours_ago_end)
    }
}

/// Full analysis of one asset over one window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    pub range: TimeRange,
    pub chunk_config: ChunkConfig,
    pub reading_count: usize,
    pub latest: Option<Reading>,
    pub half_to_half: HalfToHalf,
    /// Most recent period first (table and export order).
    pub chunks: Vec<Chunk>,
}

impl TrendAnalysis {
    /// `readings` must be chronological (oldest first).
    pub fn analyze(readings: &[Reading], range: TimeRange) -> Self {
        Self {
            range,
            chunk_config: range.chunk_config(),
            reading_count: readings.len(),
            latest: readings.last().cloned(),
            half_to_half: half_to_half(readings),
            chunks: chunk_readings(readings, range),
        }
    }

    /// Periods oldest first, as charts plot them.
    pub fn chart_chunks(&self) -> Vec<&Chunk> {
        self.chunks.iter().rev().collect()
    }
}
