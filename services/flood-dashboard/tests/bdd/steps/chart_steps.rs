//! BDD step definitions for chart rendering

use cucumber::{then, when};

use super::parse_list;
use crate::world::DashboardWorld;

#[when(expr = "the {string} chart tab is clicked")]
async fn chart_tab_clicked(world: &mut DashboardWorld, chart: String) {
    let chart_type = serde_json::from_value(serde_json::json!(chart)).expect("unknown chart type");
    let engine = world.engine();
    world.calls_before_action = world.http.calls();
    engine.select_chart(chart_type).await;
}

#[then(expr = "the chart shows series {string}")]
async fn chart_series(world: &mut DashboardWorld, list: String) {
    let engine = world.engine();
    let state = engine.state().read().await;
    let chart = state.chart.as_ref().expect("no chart rendered");
    let labels: Vec<String> = chart
        .data
        .datasets
        .iter()
        .map(|d| d.label.to_string())
        .collect();
    assert_eq!(labels, parse_list(&list));
}

#[then(expr = "the chart series use axes {string}")]
async fn chart_axes(world: &mut DashboardWorld, list: String) {
    let engine = world.engine();
    let state = engine.state().read().await;
    let chart = state.chart.as_ref().expect("no chart rendered");
    let axes: Vec<String> = chart
        .data
        .datasets
        .iter()
        .map(|d| d.y_axis_id.to_string())
        .collect();
    assert_eq!(axes, parse_list(&list));
}

#[then(expr = "the chart temperature series is {string}")]
async fn chart_temperatures(world: &mut DashboardWorld, list: String) {
    let engine = world.engine();
    let state = engine.state().read().await;
    let chart = state.chart.as_ref().expect("no chart rendered");
    let temperature = chart
        .data
        .datasets
        .iter()
        .find(|d| d.label == "Temperature (°C)")
        .expect("no temperature series");
    let expected: Vec<Option<f64>> = parse_list(&list)
        .iter()
        .map(|v| Some(v.parse().unwrap()))
        .collect();
    assert_eq!(temperature.data, expected);
}

#[then(expr = "the chart title is {string}")]
async fn chart_title(world: &mut DashboardWorld, title: String) {
    let engine = world.engine();
    let state = engine.state().read().await;
    let chart = state.chart.as_ref().expect("no chart rendered");
    assert_eq!(chart.options.plugins.title.text, title);
}

#[then("no further API request was made")]
fn no_further_requests(world: &mut DashboardWorld) {
    assert_eq!(world.http.calls(), world.calls_before_action);
}
