//! Web dashboard: HTML shell, rendered view as JSON, and user actions

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::engine::Engine;
use crate::model::{ChartType, SourceKind};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub engine: Arc<Engine>,
}

/// Build the dashboard axum router
pub fn build_router(engine: Arc<Engine>) -> Router {
    let dashboard_state = DashboardState { engine };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/api/chart", get(chart_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/range/{count}", post(range_handler))
        .route("/api/source/{source}", post(source_handler))
        .route("/api/chart/{chart_type}", post(chart_type_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard_state)
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn view_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    axum::Json(view_json(&dashboard.engine).await)
}

async fn chart_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.engine.state().read().await;
    axum::Json(state.chart.clone())
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let outcome = dashboard.engine.refresh().await;
    tracing::debug!("Manual refresh finished: {:?}", outcome);
    axum::Json(view_json(&dashboard.engine).await)
}

async fn range_handler(
    State(dashboard): State<DashboardState>,
    Path(count): Path<u32>,
) -> Response {
    if count == 0 {
        return (StatusCode::BAD_REQUEST, "range must be at least 1").into_response();
    }
    dashboard.engine.change_range(count).await;
    axum::Json(view_json(&dashboard.engine).await).into_response()
}

async fn source_handler(
    State(dashboard): State<DashboardState>,
    Path(source): Path<SourceKind>,
) -> impl IntoResponse {
    dashboard.engine.toggle_source(source).await;
    axum::Json(view_json(&dashboard.engine).await)
}

async fn chart_type_handler(
    State(dashboard): State<DashboardState>,
    Path(chart_type): Path<ChartType>,
) -> impl IntoResponse {
    dashboard.engine.select_chart(chart_type).await;
    axum::Json(view_json(&dashboard.engine).await)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn view_json(engine: &Engine) -> serde_json::Value {
    let state = engine.state().read().await;
    serde_json::json!({
        "slots": state.display.slots,
        "indicators": state.display.indicators,
        "loading": engine.is_loading(),
        "last_updated": state.last_updated,
        "source": state.source,
        "chart_type": state.chart_type,
        "range": state.range,
    })
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Flood Dashboard</title>
    <link rel="stylesheet" href="https://fonts.googleapis.com/icon?family=Material+Icons">
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 0 auto; padding: 1rem; }
        .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 0.75rem; }
        .card { border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 0.75rem; }
        .card h3 { margin: 0 0 0.25rem; font-size: 0.9rem; color: #6c757d; }
        .risk-indicator { display: inline-flex; align-items: center; justify-content: center; width: 2rem; height: 2rem; border-radius: 50%; font-weight: 700; }
        .risk-low { color: #155724; background-color: #d4edda; }
        .risk-medium { color: #856404; background-color: #fff3cd; }
        .risk-high { color: #721c24; background-color: #f8d7da; }
        .chart-tab { border: 1px solid #dee2e6; background: #fff; padding: 0.25rem 0.75rem; cursor: pointer; }
        .chart-tab.active { background: #0d6efd; color: #fff; }
        #loading-overlay { position: fixed; inset: 0; background: rgba(255, 255, 255, 0.6); display: flex; align-items: center; justify-content: center; }
        #loading-overlay.hidden { display: none; }
    </style>
</head>
<body>
    <div id="loading-overlay" class="hidden">Loading&hellip;</div>
    <h1>Flood Dashboard</h1>
    <p><span id="last-updated"></span> <button id="refresh-btn">Refresh</button></p>

    <section class="cards">
        <div class="card"><h3>Current Risk</h3><span id="current-risk-indicator" class="risk-indicator"></span> <span id="current-risk">-</span></div>
        <div class="card"><h3>24h Forecast</h3><span id="24hr-risk-indicator" class="risk-indicator"></span> <span id="24hr-forecast">-</span></div>
        <div class="card"><h3>48h Forecast</h3><span id="48hr-risk-indicator" class="risk-indicator"></span> <span id="48hr-forecast">-</span></div>
    </section>

    <section class="cards" style="margin-top: 0.75rem;">
        <div class="card"><h3>Temperature</h3><span id="temperature">-</span></div>
        <div class="card"><h3>Humidity</h3><span id="humidity">-</span></div>
        <div class="card"><h3>Rain</h3><span id="rain">-</span></div>
        <div class="card"><h3>Soil Moisture</h3><span id="soil-moisture">-</span></div>
        <div class="card"><h3>Surface Pressure</h3><span id="surface-pressure">-</span></div>
        <div class="card"><h3>Water Flow</h3><span id="water-flow">-</span></div>
        <div class="card"><h3>Water Depth</h3><span id="water-depth">-</span></div>
    </section>

    <section style="margin-top: 1rem;">
        <select id="data-toggle">
            <option value="hourly">Hourly</option>
            <option value="daily">Daily</option>
        </select>
        <select id="data-range">
            <option value="10">10 readings</option>
            <option value="24">24 readings</option>
            <option value="48">48 readings</option>
            <option value="72">72 readings</option>
            <option value="168">168 readings</option>
        </select>
        <button class="chart-tab active" data-chart="all">All</button>
        <button class="chart-tab" data-chart="temp-humidity">Temp / Humidity</button>
        <button class="chart-tab" data-chart="rain-soil">Rain / Soil</button>
        <button class="chart-tab" data-chart="water-metrics">Water</button>
        <canvas id="forecast-chart"></canvas>
    </section>

    <script>
        let forecastChart;
        let paintedChart = null;

        function paintView(view) {
            for (const [id, text] of Object.entries(view.slots)) {
                const el = document.getElementById(id);
                if (el) el.textContent = text;
            }
            for (const [id, indicator] of Object.entries(view.indicators)) {
                const el = document.getElementById(id);
                if (!el) continue;
                el.className = 'risk-indicator ' + indicator.class;
                if (indicator.icon) {
                    el.innerHTML = '<i class="material-icons">' + indicator.icon + '</i>';
                } else {
                    el.textContent = indicator.text || '';
                }
            }
            document.getElementById('last-updated').textContent = view.last_updated || '';
            document.getElementById('loading-overlay').classList.toggle('hidden', !view.loading);
            document.getElementById('data-toggle').value = view.source;
            syncRange(String(view.range));
            document.querySelectorAll('.chart-tab').forEach(tab => {
                tab.classList.toggle('active', tab.dataset.chart === view.chart_type);
            });
        }

        function syncRange(range) {
            const select = document.getElementById('data-range');
            if (![...select.options].some(option => option.value === range)) {
                select.add(new Option(range + ' readings', range));
            }
            select.value = range;
        }

        function paintChart(body) {
            if (body === paintedChart) return;
            const config = JSON.parse(body);
            if (!config) return;
            paintedChart = body;
            if (forecastChart) forecastChart.destroy();
            const ctx = document.getElementById('forecast-chart').getContext('2d');
            forecastChart = new Chart(ctx, config);
        }

        async function load() {
            try {
                paintView(await (await fetch('/api/view')).json());
                paintChart(await (await fetch('/api/chart')).text());
            } catch (error) {
                console.error('Dashboard update failed:', error);
            }
        }

        async function act(path) {
            document.getElementById('loading-overlay').classList.remove('hidden');
            try {
                await fetch(path, { method: 'POST' });
            } catch (error) {
                console.error('Action failed:', error);
            } finally {
                await load();
            }
        }

        document.getElementById('refresh-btn').addEventListener('click', () => act('/api/refresh'));
        document.getElementById('data-range').addEventListener('change', e => act('/api/range/' + e.target.value));
        document.getElementById('data-toggle').addEventListener('change', e => act('/api/source/' + e.target.value));
        document.querySelectorAll('.chart-tab').forEach(tab => {
            tab.addEventListener('click', e => act('/api/chart/' + e.target.dataset.chart));
        });

        load();
        setInterval(load, 5000);
    </script>
</body>
</html>"#;
