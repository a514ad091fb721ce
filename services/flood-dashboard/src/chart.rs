//! Line chart configuration built from the snapshot's sensor series.
//!
//! The output mirrors the Chart.js configuration object so the HTML shell
//! can hand it straight to `new Chart(ctx, config)`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ChartType, SensorReading, SourceKind};
use crate::render::format_timestamp;

const PRIMARY_AXIS: &str = "y";
const SECONDARY_AXIS: &str = "y1";

/// A complete chart; a new one replaces the previous chart wholesale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    pub border_width: u32,
    pub tension: f64,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub interaction: Interaction,
    pub plugins: Plugins,
    pub scales: BTreeMap<&'static str, Scale>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub mode: &'static str,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub display: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scale {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<Ticks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub max_rotation: u32,
    pub min_rotation: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_on_chart_area: Option<bool>,
}

#[derive(Clone, Copy)]
enum Series {
    Temperature,
    Humidity,
    Pressure,
    Rain,
    SoilMoisture,
    WaterFlow,
    WaterDepth,
}

impl Series {
    fn label(self) -> &'static str {
        match self {
            Series::Temperature => "Temperature (°C)",
            Series::Humidity => "Humidity (%)",
            Series::Pressure => "Pressure (hPa/10)",
            Series::Rain => "Rain (mm)",
            Series::SoilMoisture => "Soil Moisture (m³/m³)",
            Series::WaterFlow => "Water Flow (m³/s)",
            Series::WaterDepth => "Water Depth (m)",
        }
    }

    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Series::Temperature => (255, 99, 132),
            Series::Humidity => (54, 162, 235),
            Series::Pressure => (255, 159, 64),
            Series::Rain => (75, 192, 192),
            Series::SoilMoisture => (153, 102, 255),
            Series::WaterFlow => (255, 206, 86),
            Series::WaterDepth => (111, 66, 193),
        }
    }

    fn value(self, reading: &SensorReading) -> Option<f64> {
        match self {
            Series::Temperature => reading.temperature,
            Series::Humidity => reading.relative_humidity,
            // Scaled down to share the left axis with temperature
            Series::Pressure => reading.surface_pressure.map(|p| p / 10.0),
            Series::Rain => reading.rain,
            Series::SoilMoisture => reading.soil_moisture,
            Series::WaterFlow => Some(reading.water_flow.unwrap_or(0.0)),
            Series::WaterDepth => Some(reading.water_depth.unwrap_or(0.0)),
        }
    }

    fn dataset(self, readings: &[SensorReading], y_axis_id: &'static str) -> Dataset {
        let (r, g, b) = self.rgb();
        Dataset {
            label: self.label(),
            data: readings.iter().map(|reading| self.value(reading)).collect(),
            border_color: format!("rgba({}, {}, {}, 1)", r, g, b),
            background_color: format!("rgba({}, {}, {}, 0.2)", r, g, b),
            border_width: 2,
            tension: 0.2,
            y_axis_id,
        }
    }
}

/// Left axis title for a chart type
pub fn y_axis_title(chart_type: ChartType) -> &'static str {
    match chart_type {
        ChartType::TempHumidity => "Temperature (°C) / Humidity (%)",
        ChartType::RainSoil => "Rain (mm) / Soil Moisture (m³/m³)",
        ChartType::WaterMetrics => "Water Flow (m³/s) / Water Depth (m)",
        ChartType::All => "Temperature (°C) / Humidity (%) / Pressure (hPa/10)",
    }
}

/// Water series exist only for hourly data that carries water fields
fn has_water_metrics(readings: &[SensorReading], source: SourceKind) -> bool {
    source == SourceKind::Hourly
        && readings
            .iter()
            .any(|r| r.water_flow.is_some() || r.water_depth.is_some())
}

/// Build the chart for `readings` (oldest first). Returns `None` when there
/// is nothing to plot.
pub fn render_chart(
    readings: &[SensorReading],
    chart_type: ChartType,
    source: SourceKind,
) -> Option<ChartConfig> {
    if readings.is_empty() {
        return None;
    }

    let all = chart_type == ChartType::All;
    let secondary = if all { SECONDARY_AXIS } else { PRIMARY_AXIS };
    let mut series: Vec<(Series, &'static str)> = Vec::new();

    if all || chart_type == ChartType::TempHumidity {
        series.push((Series::Temperature, PRIMARY_AXIS));
        series.push((Series::Humidity, PRIMARY_AXIS));
    }
    if all {
        series.push((Series::Pressure, PRIMARY_AXIS));
    }
    if all || chart_type == ChartType::RainSoil {
        series.push((Series::Rain, secondary));
        series.push((Series::SoilMoisture, secondary));
    }
    if (all || chart_type == ChartType::WaterMetrics) && has_water_metrics(readings, source) {
        series.push((Series::WaterFlow, secondary));
        series.push((Series::WaterDepth, secondary));
    }

    let datasets = series
        .into_iter()
        .map(|(s, axis)| s.dataset(readings, axis))
        .collect();

    let mut scales = BTreeMap::new();
    scales.insert(
        "x",
        Scale {
            ticks: Some(Ticks {
                max_rotation: 45,
                min_rotation: 45,
            }),
            ..Scale::default()
        },
    );
    scales.insert(
        PRIMARY_AXIS,
        Scale {
            kind: Some("linear"),
            display: Some(true),
            position: Some("left"),
            title: Some(Title {
                display: true,
                text: y_axis_title(chart_type).to_string(),
                font: None,
            }),
            grid: Some(Grid {
                color: Some("rgba(0, 0, 0, 0.1)"),
                draw_on_chart_area: None,
            }),
            ticks: None,
        },
    );
    if all {
        scales.insert(
            SECONDARY_AXIS,
            Scale {
                kind: Some("linear"),
                display: Some(true),
                position: Some("right"),
                title: Some(Title {
                    display: true,
                    text: "Rain (mm) / Soil Moisture (m³/m³) / Water Flow (m³/s) / Water Depth (m)"
                        .to_string(),
                    font: None,
                }),
                grid: Some(Grid {
                    color: None,
                    draw_on_chart_area: Some(false),
                }),
                ticks: None,
            },
        );
    }

    Some(ChartConfig {
        kind: "line",
        data: ChartData {
            labels: readings
                .iter()
                .map(|r| format_timestamp(&r.datetime))
                .collect(),
            datasets,
        },
        options: ChartOptions {
            responsive: true,
            interaction: Interaction {
                mode: "index",
                intersect: false,
            },
            plugins: Plugins {
                title: Title {
                    display: true,
                    text: format!("Sensor Data Trends ({})", source),
                    font: Some(Font { size: 16 }),
                },
            },
            scales,
        },
    })
}
