//! Engine: refresh cycles, user actions and the refresh timer

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::fetcher::FloodApiClient;
use crate::model::{ChartType, PredictionKind, SourceKind};
use crate::state::{DataSlice, LoadingTracker, StateHandle};

/// How one fetch of a refresh group ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result written to the snapshot
    Applied,
    /// A newer fetch for the same slice was issued; result dropped
    Superseded,
    /// Network, parse or empty-result failure; snapshot untouched
    Failed,
}

/// Outcome of a full refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub hourly: FetchOutcome,
    pub daily: FetchOutcome,
    pub daily_prediction: FetchOutcome,
    pub hourly_prediction: FetchOutcome,
}

impl CycleOutcome {
    fn outcomes(&self) -> [FetchOutcome; 4] {
        [
            self.hourly,
            self.daily,
            self.daily_prediction,
            self.hourly_prediction,
        ]
    }

    /// True when at least one fetch landed and the view was re-rendered
    pub fn rendered(&self) -> bool {
        self.outcomes().contains(&FetchOutcome::Applied)
    }

    pub fn failures(&self) -> usize {
        self.outcomes()
            .iter()
            .filter(|o| **o == FetchOutcome::Failed)
            .count()
    }
}

/// The engine owns the API client and drives every fetch and render
pub struct Engine {
    api: FloodApiClient,
    state: StateHandle,
    loading: LoadingTracker,
    refresh_interval: Duration,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("api", &self.api)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl Engine {
    pub fn new(
        api: FloodApiClient,
        state: StateHandle,
        refresh_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            state,
            loading: LoadingTracker::default(),
            refresh_interval,
            cancel,
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Fetch all four endpoints concurrently, then render once all of them
    /// have settled.
    pub async fn refresh(&self) -> CycleOutcome {
        let _loading = self.loading.begin();
        let range = self.state.read().await.range;

        let (hourly, daily, daily_prediction, hourly_prediction) = tokio::join!(
            self.load_readings(SourceKind::Hourly, range),
            self.load_readings(SourceKind::Daily, range),
            self.load_prediction(PredictionKind::Daily),
            self.load_prediction(PredictionKind::Hourly),
        );
        let outcome = CycleOutcome {
            hourly,
            daily,
            daily_prediction,
            hourly_prediction,
        };

        if outcome.rendered() {
            let mut state = self.state.write().await;
            state.render();
            state.mark_updated(&chrono::Local::now());
            tracing::info!(
                "Refresh cycle rendered ({} of 4 fetches failed)",
                outcome.failures()
            );
        } else {
            tracing::warn!("Refresh cycle produced no new data, keeping previous view");
        }
        outcome
    }

    /// Range selector changed: refetch the current source with `count`
    pub async fn change_range(&self, count: u32) -> FetchOutcome {
        let _loading = self.loading.begin();
        let source = {
            let mut state = self.state.write().await;
            state.range = count;
            state.source
        };
        tracing::debug!("Range changed to {} ({})", count, source);
        self.reload_source(source, count).await
    }

    /// Source toggle changed: switch and refetch
    pub async fn toggle_source(&self, source: SourceKind) -> FetchOutcome {
        let _loading = self.loading.begin();
        let range = {
            let mut state = self.state.write().await;
            state.source = source;
            state.range
        };
        tracing::debug!("Data source switched to {}", source);
        self.reload_source(source, range).await
    }

    /// Chart tab clicked: re-render from the snapshot without fetching
    pub async fn select_chart(&self, chart_type: ChartType) {
        let mut state = self.state.write().await;
        state.chart_type = chart_type;
        state.render_chart();
        tracing::debug!("Chart type switched to {}", chart_type);
    }

    /// Run the initial refresh and then one per interval until cancelled
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Refresh timer cancelled");
                    break;
                }
            }

            tokio::select! {
                _ = self.refresh() => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Refresh cycle abandoned on shutdown");
                    break;
                }
            }
        }
    }

    async fn reload_source(&self, source: SourceKind, count: u32) -> FetchOutcome {
        let outcome = self.load_readings(source, count).await;
        if outcome == FetchOutcome::Applied {
            self.state.write().await.render();
        }
        outcome
    }

    async fn load_readings(&self, source: SourceKind, count: u32) -> FetchOutcome {
        let sequence = self.state.write().await.begin_fetch(source.into());

        match self.api.fetch_sensor_data(count, source).await {
            Ok(readings) => {
                let mut state = self.state.write().await;
                if state.apply_readings(source, sequence, readings) {
                    FetchOutcome::Applied
                } else {
                    tracing::debug!("Discarding superseded {} fetch #{}", source, sequence);
                    FetchOutcome::Superseded
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} data: {}", source, e);
                FetchOutcome::Failed
            }
        }
    }

    async fn load_prediction(&self, kind: PredictionKind) -> FetchOutcome {
        let slice = DataSlice::from(kind);
        let sequence = self.state.write().await.begin_fetch(slice);

        match self.api.fetch_prediction(kind).await {
            Ok(record) => {
                let mut state = self.state.write().await;
                if state.apply_prediction(kind, sequence, record) {
                    FetchOutcome::Applied
                } else {
                    tracing::debug!("Discarding superseded {} fetch #{}", kind, sequence);
                    FetchOutcome::Superseded
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", kind, e);
                FetchOutcome::Failed
            }
        }
    }
}
