//! Wire types for the flood API and the dashboard's view modes

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A timestamp as delivered by the API: either Unix seconds or an already
/// formatted date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(f64),
    Text(String),
}

impl Timestamp {
    /// Unix seconds if the value is numeric, including numeric strings.
    /// A blank string counts as zero.
    pub fn as_unix_seconds(&self) -> Option<f64> {
        match self {
            Timestamp::Unix(secs) => Some(*secs),
            Timestamp::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|secs| !secs.is_nan())
            }
        }
    }
}

/// One row of sensor data, oldest to newest in a fetched sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub datetime: Timestamp,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub relative_humidity: Option<f64>,
    #[serde(default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_flow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_depth: Option<f64>,
}

/// Flood risk classification produced by the predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RiskCode {
    Low,
    Medium,
    High,
    /// "Insufficient Data", a missing value, or anything outside 0..=2
    #[default]
    Unknown,
}

impl RiskCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => RiskCode::Low,
            1 => RiskCode::Medium,
            2 => RiskCode::High,
            _ => RiskCode::Unknown,
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            RiskCode::Low => Some(0),
            RiskCode::Medium => Some(1),
            RiskCode::High => Some(2),
            RiskCode::Unknown => None,
        }
    }
}

impl<'de> Deserialize<'de> for RiskCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let code = match &value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        };
        Ok(code.map(RiskCode::from_code).unwrap_or(RiskCode::Unknown))
    }
}

impl Serialize for RiskCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.code() {
            Some(code) => serializer.serialize_i64(code),
            None => serializer.serialize_str("Insufficient Data"),
        }
    }
}

/// One prediction row; the last row of a response is the current one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<Timestamp>,
    #[serde(default)]
    pub prediction_24: RiskCode,
    #[serde(default)]
    pub prediction_48: RiskCode,
}

/// Granularity of the sensor series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Hourly,
    Daily,
}

impl SourceKind {
    /// API path segment for this source
    pub fn endpoint(&self) -> &'static str {
        match self {
            SourceKind::Hourly => "hourly",
            SourceKind::Daily => "raw",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Hourly => write!(f, "Hourly"),
            SourceKind::Daily => write!(f, "Daily"),
        }
    }
}

/// Horizon of a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionKind {
    /// 24h and 48h forecasts
    Daily,
    /// Current risk
    Hourly,
}

impl PredictionKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            PredictionKind::Daily => "prediction",
            PredictionKind::Hourly => "hourly_prediction",
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionKind::Daily => write!(f, "daily prediction"),
            PredictionKind::Hourly => write!(f, "hourly prediction"),
        }
    }
}

/// Which series the chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    #[default]
    All,
    TempHumidity,
    RainSoil,
    WaterMetrics,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartType::All => "all",
            ChartType::TempHumidity => "temp-humidity",
            ChartType::RainSoil => "rain-soil",
            ChartType::WaterMetrics => "water-metrics",
        };
        write!(f, "{}", name)
    }
}
