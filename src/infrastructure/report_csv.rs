// CSV report export for a single asset's trend analysis
use crate::domain::asset::{Asset, Prediction};
use crate::domain::reading::Metric;
use crate::domain::trend::{Aggregate, TrendAnalysis};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, WriterBuilder};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub struct ReportContext<'a> {
    pub asset: &'a Asset,
    pub analysis: &'a TrendAnalysis,
    pub prediction: Option<&'a Prediction>,
    pub generated_at: DateTime<Utc>,
}

/// Render the multi-section report. Every field is quoted.
pub fn write_report(ctx: &ReportContext<'_>) -> Result<String, ReportError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(vec![]);

    for row in report_rows(ctx) {
        wtr.write_record(&row)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn report_rows(ctx: &ReportContext<'_>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    asset_section(&mut rows, ctx);
    rows.push(blank());
    status_section(&mut rows, ctx.analysis);
    rows.push(blank());
    half_section(&mut rows, ctx.analysis);
    rows.push(blank());
    segment_section(&mut rows, ctx.analysis);
    rows.push(blank());
    prediction_section(&mut rows, ctx.prediction);

    rows
}

fn asset_section(rows: &mut Vec<Vec<String>>, ctx: &ReportContext<'_>) {
    let asset = ctx.asset;
    let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    rows.push(row(["Asset Information"]));
    rows.push(row(["Asset ID", asset.id.as_str()]));
    rows.push(row(["Name", asset.name.as_str()]));
    rows.push(vec!["Location".to_string(), optional(&asset.location)]);
    rows.push(vec!["Manufacturer".to_string(), optional(&asset.manufacturer)]);
    rows.push(vec!["Model".to_string(), optional(&asset.model)]);
    rows.push(vec![
        "Time Range".to_string(),
        format!("Last {} hours", ctx.analysis.range.hours()),
    ]);
    rows.push(vec![
        "Readings Analyzed".to_string(),
        ctx.analysis.reading_count.to_string(),
    ]);
    rows.push(vec![
        "Generated At".to_string(),
        ctx.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    ]);
}

fn status_section(rows: &mut Vec<Vec<String>>, analysis: &TrendAnalysis) {
    rows.push(row(["Current Sensor Status"]));
    rows.push(row(["Metric", "Value", "Unit"]));
    for metric in Metric::ALL {
        let value = analysis.latest.as_ref().map(|r| r.value(metric));
        rows.push(vec![
            metric.label().to_string(),
            format_value(value),
            metric.unit().to_string(),
        ]);
    }
}

fn half_section(rows: &mut Vec<Vec<String>>, analysis: &TrendAnalysis) {
    let halves = &analysis.half_to_half;

    rows.push(row(["Trend Analysis (First Half vs Second Half)"]));
    rows.push(row(["Metric", "Statistic", "Current (Previous)", "Rate of Change (%)"]));
    for metric in Metric::ALL {
        let first = halves.first_half.get(metric);
        let second = halves.second_half.get(metric);
        let change = halves.rate_of_change.get(metric);

        let stats: [(&str, fn(&Aggregate) -> Option<f64>); 3] = [
            ("Average", |a| a.mean),
            ("Maximum", |a| a.max),
            ("Minimum", |a| a.min),
        ];
        for (statistic, pick) in stats {
            rows.push(vec![
                metric.label().to_string(),
                statistic.to_string(),
                format_comparison(pick(second), pick(first)),
                format_value(pick(change)),
            ]);
        }
    }
}

fn segment_section(rows: &mut Vec<Vec<String>>, analysis: &TrendAnalysis) {
    rows.push(row(["Time Segment Trend Analysis"]));

    let mut header = vec!["Period".to_string()];
    for metric in Metric::ALL {
        header.push(format!("Avg {}", metric.label()));
        header.push(format!("{} RoC (%)", metric.label()));
    }
    rows.push(header);

    for chunk in &analysis.chunks {
        let mut line = vec![chunk.label.clone()];
        for metric in Metric::ALL {
            line.push(format_value(Some(*chunk.mean.get(metric))));
            line.push(format_value(*chunk.rate_of_change.get(metric)));
        }
        rows.push(line);
    }
}

fn prediction_section(rows: &mut Vec<Vec<String>>, prediction: Option<&Prediction>) {
    rows.push(row(["ML Prediction"]));
    match prediction {
        Some(p) => {
            rows.push(vec![
                "Failure Probability".to_string(),
                format!("{:.1}%", p.probability * 100.0),
            ]);
            rows.push(row(["Risk Level", p.risk_level.as_str()]));
            rows.push(row(["Model Version", p.model_version.as_str()]));
            rows.push(vec![
                "Predicted At".to_string(),
                p.predicted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ]);
        }
        None => rows.push(row(["No prediction available"])),
    }
}

fn row<const N: usize>(fields: [&str; N]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn blank() -> Vec<String> {
    vec![String::new()]
}

fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Current value with the earlier one in parentheses, e.g. `12.50 (was 10.00)`.
fn format_comparison(current: Option<f64>, previous: Option<f64>) -> String {
    format!("{} (was {})", format_value(current), format_value(previous))
}
