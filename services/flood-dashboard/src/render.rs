//! Display slot rendering: value/timestamp formatting and risk indicators

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

use crate::model::{PredictionRecord, RiskCode, SensorReading, Timestamp};

pub const SOIL_MOISTURE: &str = "soil-moisture";
pub const RAIN: &str = "rain";
pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const SURFACE_PRESSURE: &str = "surface-pressure";
pub const WATER_FLOW: &str = "water-flow";
pub const WATER_DEPTH: &str = "water-depth";
pub const FORECAST_24H: &str = "24hr-forecast";
pub const FORECAST_48H: &str = "48hr-forecast";
pub const CURRENT_RISK: &str = "current-risk";
pub const INDICATOR_24H: &str = "24hr-risk-indicator";
pub const INDICATOR_48H: &str = "48hr-risk-indicator";
pub const INDICATOR_CURRENT: &str = "current-risk-indicator";

pub const NOT_AVAILABLE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

const LOCAL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// How one risk level is presented on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPresentation {
    pub label: &'static str,
    pub class: &'static str,
    /// Material icon name; `None` means the glyph is shown as text
    pub icon: Option<&'static str>,
    pub glyph: &'static str,
}

const RISK_TABLE: [(RiskCode, RiskPresentation); 4] = [
    (
        RiskCode::Low,
        RiskPresentation {
            label: "Low Risk",
            class: "risk-low",
            icon: Some("check_circle"),
            glyph: "✔",
        },
    ),
    (
        RiskCode::Medium,
        RiskPresentation {
            label: "Medium Risk",
            class: "risk-medium",
            icon: Some("warning"),
            glyph: "⚠",
        },
    ),
    (
        RiskCode::High,
        RiskPresentation {
            label: "High Risk",
            class: "risk-high",
            icon: Some("error"),
            glyph: "✖",
        },
    ),
    (
        RiskCode::Unknown,
        RiskPresentation {
            label: "Insufficient Data",
            class: "risk-medium",
            icon: None,
            glyph: "?",
        },
    ),
];

/// Look up the presentation for a risk code. Shared by indicators and
/// forecast text.
pub fn risk_presentation(risk: RiskCode) -> &'static RiskPresentation {
    RISK_TABLE
        .iter()
        .find(|(code, _)| *code == risk)
        .map(|(_, presentation)| presentation)
        .unwrap_or(&RISK_TABLE[3].1)
}

/// Rendered state of a risk indicator slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskIndicator {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&RiskPresentation> for RiskIndicator {
    fn from(presentation: &RiskPresentation) -> Self {
        match presentation.icon {
            Some(icon) => Self {
                class: presentation.class.to_string(),
                icon: Some(icon.to_string()),
                text: None,
            },
            None => Self {
                class: presentation.class.to_string(),
                icon: None,
                text: Some(presentation.glyph.to_string()),
            },
        }
    }
}

/// Named display slots, keyed by the element ids of the HTML shell
#[derive(Debug, Clone, Default, Serialize)]
pub struct Display {
    #[serde(skip)]
    water_slots: bool,
    pub slots: BTreeMap<String, String>,
    pub indicators: BTreeMap<String, RiskIndicator>,
}

impl Display {
    pub fn new(water_slots: bool) -> Self {
        Self {
            water_slots,
            ..Self::default()
        }
    }

    pub fn has_water_slots(&self) -> bool {
        self.water_slots
    }

    pub fn slot(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(String::as_str)
    }

    pub fn indicator(&self, id: &str) -> Option<&RiskIndicator> {
        self.indicators.get(id)
    }

    fn set(&mut self, id: &str, text: String) {
        self.slots.insert(id.to_string(), text);
    }
}

/// Format a measurement with `precision` decimals and a unit suffix
pub fn format_value(value: Option<f64>, unit: &str, precision: usize) -> String {
    match value {
        Some(v) => format!("{}{}", to_fixed(v, precision), unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Fixed-point formatting where exact midpoints round away from zero.
fn to_fixed(value: f64, precision: usize) -> String {
    // `value` sits exactly halfway between two candidates iff
    // value * 2^(precision + 1) is an odd integer.
    let doubled = value.abs() * 2f64.powi(precision as i32 + 1);
    let value = if value == 0.0 {
        // Negative zero prints unsigned
        0.0
    } else if doubled.fract() == 0.0 && doubled % 2.0 == 1.0 {
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{:.*}", precision, value)
}

/// Format a timestamp as a local date-time string.
///
/// Numbers (and numeric strings) are Unix seconds. Other strings are parsed
/// as dates and re-emitted in local time.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    let parsed = match (timestamp.as_unix_seconds(), timestamp) {
        (Some(secs), _) => from_unix_seconds(secs),
        (None, Timestamp::Text(text)) => parse_date_text(text),
        (None, Timestamp::Unix(_)) => None,
    };
    match parsed {
        Some(datetime) => format_local(&datetime),
        None => INVALID_DATE.to_string(),
    }
}

/// Local date-time string used for timestamps and the last-updated line
pub fn format_local(datetime: &DateTime<Local>) -> String {
    datetime.format(LOCAL_FORMAT).to_string()
}

fn from_unix_seconds(secs: f64) -> Option<DateTime<Local>> {
    let millis = (secs * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|utc| utc.with_timezone(&Local))
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Pin a wall-clock time to `tz`. Ambiguous times take the earlier instant;
/// times skipped by a forward transition move one hour later.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest().or_else(|| {
        naive
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
    })
}

fn parse_date_text(text: &str) -> Option<DateTime<Local>> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Local));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(text) {
        return Some(datetime.with_timezone(&Local));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            // Date-time strings without an offset are local time
            return resolve_local(&Local, &naive);
        }
    }
    // Bare dates are midnight UTC
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// Write the newest reading into the measurement slots
pub fn render_latest_reading(display: &mut Display, reading: &SensorReading) {
    display.set(SOIL_MOISTURE, format_value(reading.soil_moisture, "m³/m³", 1));
    display.set(RAIN, format_value(reading.rain, "mm", 1));
    display.set(TEMPERATURE, format_value(reading.temperature, "°C", 1));
    display.set(HUMIDITY, format_value(reading.relative_humidity, "%", 1));
    display.set(SURFACE_PRESSURE, format_value(reading.surface_pressure, "hPa", 1));

    if display.has_water_slots() {
        display.set(WATER_FLOW, format_value(reading.water_flow, "m³/s", 1));
        display.set(WATER_DEPTH, format_value(reading.water_depth, "m", 1));
    }
}

/// Set an indicator slot from a risk code
pub fn render_risk_indicator(display: &mut Display, slot: &str, risk: RiskCode) {
    display
        .indicators
        .insert(slot.to_string(), risk_presentation(risk).into());
}

/// Fill the 24h/48h forecast text and indicators from the daily prediction
pub fn render_daily_prediction(display: &mut Display, prediction: &PredictionRecord) {
    display.set(
        FORECAST_24H,
        risk_presentation(prediction.prediction_24).label.to_string(),
    );
    display.set(
        FORECAST_48H,
        risk_presentation(prediction.prediction_48).label.to_string(),
    );
    render_risk_indicator(display, INDICATOR_24H, prediction.prediction_24);
    render_risk_indicator(display, INDICATOR_48H, prediction.prediction_48);
}

/// Fill the current-risk text and indicator from the hourly prediction.
/// The hourly model's 24h output is the current risk.
pub fn render_current_risk(display: &mut Display, prediction: &PredictionRecord) {
    display.set(
        CURRENT_RISK,
        risk_presentation(prediction.prediction_24).label.to_string(),
    );
    render_risk_indicator(display, INDICATOR_CURRENT, prediction.prediction_24);
}
