//! Shared dashboard state: the snapshot of fetched data, the current view
//! modes, and everything rendered from them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::chart::{render_chart, ChartConfig};
use crate::model::{ChartType, PredictionKind, PredictionRecord, SensorReading, SourceKind};
use crate::render::{self, Display};

/// One independently replaced part of the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSlice {
    Hourly,
    Daily,
    DailyPrediction,
    HourlyPrediction,
}

impl DataSlice {
    fn index(self) -> usize {
        match self {
            DataSlice::Hourly => 0,
            DataSlice::Daily => 1,
            DataSlice::DailyPrediction => 2,
            DataSlice::HourlyPrediction => 3,
        }
    }
}

impl From<SourceKind> for DataSlice {
    fn from(source: SourceKind) -> Self {
        match source {
            SourceKind::Hourly => DataSlice::Hourly,
            SourceKind::Daily => DataSlice::Daily,
        }
    }
}

impl From<PredictionKind> for DataSlice {
    fn from(kind: PredictionKind) -> Self {
        match kind {
            PredictionKind::Daily => DataSlice::DailyPrediction,
            PredictionKind::Hourly => DataSlice::HourlyPrediction,
        }
    }
}

/// Most recent successfully fetched data. Each slice is replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub hourly: Option<Vec<SensorReading>>,
    pub daily: Option<Vec<SensorReading>>,
    pub daily_prediction: Option<PredictionRecord>,
    pub hourly_prediction: Option<PredictionRecord>,
}

impl Snapshot {
    pub fn readings(&self, source: SourceKind) -> Option<&[SensorReading]> {
        match source {
            SourceKind::Hourly => self.hourly.as_deref(),
            SourceKind::Daily => self.daily.as_deref(),
        }
    }
}

/// Snapshot, view modes and rendered output
#[derive(Debug)]
pub struct ViewState {
    pub snapshot: Snapshot,
    pub source: SourceKind,
    pub chart_type: ChartType,
    pub range: u32,
    pub display: Display,
    pub chart: Option<ChartConfig>,
    pub last_updated: Option<String>,
    issued: [u64; 4],
    next_sequence: u64,
}

impl ViewState {
    pub fn new(source: SourceKind, chart_type: ChartType, range: u32, water_slots: bool) -> Self {
        Self {
            snapshot: Snapshot::default(),
            source,
            chart_type,
            range,
            display: Display::new(water_slots),
            chart: None,
            last_updated: None,
            issued: [0; 4],
            next_sequence: 0,
        }
    }

    /// Tag a new fetch for `slice`. Any fetch for the same slice issued
    /// earlier is superseded from now on.
    pub fn begin_fetch(&mut self, slice: DataSlice) -> u64 {
        self.next_sequence += 1;
        self.issued[slice.index()] = self.next_sequence;
        self.next_sequence
    }

    /// Whether `sequence` is still the newest fetch issued for `slice`
    pub fn is_current(&self, slice: DataSlice, sequence: u64) -> bool {
        self.issued[slice.index()] == sequence
    }

    /// Replace a readings slice. Returns false, leaving the snapshot as is,
    /// when the fetch has been superseded.
    pub fn apply_readings(
        &mut self,
        source: SourceKind,
        sequence: u64,
        readings: Vec<SensorReading>,
    ) -> bool {
        if !self.is_current(source.into(), sequence) {
            return false;
        }
        match source {
            SourceKind::Hourly => self.snapshot.hourly = Some(readings),
            SourceKind::Daily => self.snapshot.daily = Some(readings),
        }
        true
    }

    /// Replace a prediction slice, unless superseded
    pub fn apply_prediction(
        &mut self,
        kind: PredictionKind,
        sequence: u64,
        record: PredictionRecord,
    ) -> bool {
        if !self.is_current(kind.into(), sequence) {
            return false;
        }
        match kind {
            PredictionKind::Daily => self.snapshot.daily_prediction = Some(record),
            PredictionKind::Hourly => self.snapshot.hourly_prediction = Some(record),
        }
        true
    }

    /// Re-derive every display slot and the chart from the snapshot
    pub fn render(&mut self) {
        let mut display = Display::new(self.display.has_water_slots());
        if let Some(latest) = self.snapshot.hourly.as_ref().and_then(|r| r.last()) {
            render::render_latest_reading(&mut display, latest);
        }
        if let Some(prediction) = &self.snapshot.daily_prediction {
            render::render_daily_prediction(&mut display, prediction);
        }
        if let Some(prediction) = &self.snapshot.hourly_prediction {
            render::render_current_risk(&mut display, prediction);
        }
        self.display = display;
        self.render_chart();
    }

    /// Rebuild the chart for the current source and chart type. Without
    /// data for the source the previous chart stays up.
    pub fn render_chart(&mut self) {
        if let Some(readings) = self.snapshot.readings(self.source) {
            if let Some(chart) = render_chart(readings, self.chart_type, self.source) {
                self.chart = Some(chart);
            }
        }
    }

    pub fn mark_updated(&mut self, now: &chrono::DateTime<chrono::Local>) {
        self.last_updated = Some(format!("Last updated: {}", render::format_local(now)));
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<ViewState>>;

pub fn new_state_handle(
    source: SourceKind,
    chart_type: ChartType,
    range: u32,
    water_slots: bool,
) -> StateHandle {
    Arc::new(RwLock::new(ViewState::new(
        source,
        chart_type,
        range,
        water_slots,
    )))
}

/// Counts outstanding fetch groups; loading is shown while any is open
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    outstanding: Arc<AtomicUsize>,
}

impl LoadingTracker {
    /// Open a group. The group closes when the guard drops, whichever way
    /// the fetches ended.
    pub fn begin(&self) -> LoadingGuard {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    outstanding: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
