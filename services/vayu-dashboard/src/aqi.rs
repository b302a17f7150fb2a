//! Air-quality bands and small display helpers

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

/// US EPA PM2.5 breakpoints (µg/m³), upper bound inclusive
const PM25_GOOD: f64 = 12.0;
const PM25_MODERATE: f64 = 35.5;
const PM25_UNHEALTHY_SENSITIVE: f64 = 55.5;
const PM25_UNHEALTHY: f64 = 150.5;
const PM25_VERY_UNHEALTHY: f64 = 250.5;

/// Indoor CO2 bands (ppm), upper bound inclusive
const CO2_GOOD: f64 = 800.0;
const CO2_MODERATE: f64 = 1000.0;
const CO2_POOR: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_pm25(pm25: f64) -> Self {
        if pm25 <= PM25_GOOD {
            AqiCategory::Good
        } else if pm25 <= PM25_MODERATE {
            AqiCategory::Moderate
        } else if pm25 <= PM25_UNHEALTHY_SENSITIVE {
            AqiCategory::UnhealthyForSensitive
        } else if pm25 <= PM25_UNHEALTHY {
            AqiCategory::Unhealthy
        } else if pm25 <= PM25_VERY_UNHEALTHY {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitive => "Unhealthy for Sensitive",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Co2Level {
    Good,
    Moderate,
    Poor,
    Unhealthy,
}

impl Co2Level {
    pub fn from_ppm(co2: f64) -> Self {
        if co2 <= CO2_GOOD {
            Co2Level::Good
        } else if co2 <= CO2_MODERATE {
            Co2Level::Moderate
        } else if co2 <= CO2_POOR {
            Co2Level::Poor
        } else {
            Co2Level::Unhealthy
        }
    }
}

impl fmt::Display for Co2Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Co2Level::Good => write!(f, "Good"),
            Co2Level::Moderate => write!(f, "Moderate"),
            Co2Level::Poor => write!(f, "Poor"),
            Co2Level::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "Low"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::High => write!(f, "High"),
        }
    }
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM:SS`
///
/// Accepts timestamps with or without an offset. Anything unparseable is
/// returned unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    timestamp.to_string()
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
