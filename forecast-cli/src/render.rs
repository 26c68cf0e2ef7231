use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ForecastDocument {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastProperties {
    updated: Option<DateTime<FixedOffset>>,
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    name: String,
    start_time: Option<DateTime<FixedOffset>>,
    temperature: Option<f64>,
    temperature_unit: Option<String>,
    short_forecast: Option<String>,
}

/// Format a forecast document for the terminal.
///
/// Anything that doesn't look like a list of periods is printed as JSON.
pub fn render(forecast: &Value, raw: bool) -> Result<String> {
    if !raw && let Some(text) = summarize(forecast) {
        return Ok(text);
    }

    serde_json::to_string_pretty(forecast).context("Failed to format forecast JSON")
}

fn summarize(forecast: &Value) -> Option<String> {
    let doc = ForecastDocument::deserialize(forecast).ok()?;
    if doc.properties.periods.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(doc.properties.periods.len() + 1);
    if let Some(updated) = doc.properties.updated {
        lines.push(format!("Updated {}", updated.format("%Y-%m-%d %H:%M %:z")));
    }
    lines.extend(doc.properties.periods.iter().map(format_period));

    Some(lines.join("\n"))
}

fn format_period(period: &Period) -> String {
    let start = period
        .start_time
        .map(|t| t.format("%a %d %b %H:%M").to_string())
        .unwrap_or_default();

    let temperature = match (period.temperature, period.temperature_unit.as_deref()) {
        (Some(t), Some(unit)) => format!("{t}°{unit}"),
        (Some(t), None) => t.to_string(),
        (None, _) => "-".to_string(),
    };

    let line = format!(
        "{:<18} {:<16} {:>6}  {}",
        period.name,
        start,
        temperature,
        period.short_forecast.as_deref().unwrap_or(""),
    );
    line.trim_end().to_string()
}
