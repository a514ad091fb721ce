//! BDD step definitions for refresh cycles

use cucumber::{given, then, when};

use flood_dashboard::io::HttpResponse;
use flood_dashboard::render::TEMPERATURE;

use super::{parse_list, readings_body};
use crate::world::{ok, DashboardWorld};

fn temperatures(list: &str) -> Vec<f64> {
    parse_list(list)
        .iter()
        .map(|t| t.parse().expect("temperature must be a number"))
        .collect()
}

#[given("the prediction endpoints report low risk")]
fn predictions_low(world: &mut DashboardWorld) {
    let body = r#"[{"prediction_24": 0, "prediction_48": 0}]"#.to_string();
    world.http.push("prediction", ok(body.clone()));
    world.http.push("hourly_prediction", ok(body));
}

#[given(expr = "the hourly endpoint returns temperatures {string}")]
fn hourly_returns(world: &mut DashboardWorld, list: String) {
    world
        .http
        .push("hourly", ok(readings_body(&temperatures(&list), false)));
}

#[given(expr = "the hourly endpoint returns temperatures {string} with water metrics")]
fn hourly_returns_water(world: &mut DashboardWorld, list: String) {
    world
        .http
        .push("hourly", ok(readings_body(&temperatures(&list), true)));
}

#[given(expr = "the daily endpoint returns temperatures {string}")]
fn daily_returns(world: &mut DashboardWorld, list: String) {
    world
        .http
        .push("raw", ok(readings_body(&temperatures(&list), false)));
}

#[given(expr = "the hourly endpoint fails with status {int}")]
fn hourly_fails(world: &mut DashboardWorld, status: u16) {
    world.http.push(
        "hourly",
        HttpResponse {
            status,
            body: "error".to_string(),
        },
    );
}

#[given("the hourly endpoint returns malformed data")]
fn hourly_malformed(world: &mut DashboardWorld) {
    world
        .http
        .push("hourly", ok(r#"{"temperature": 12}"#.to_string()));
}

#[when("the dashboard refreshes")]
async fn dashboard_refreshes(world: &mut DashboardWorld) {
    let engine = world.engine();
    engine.refresh().await;
}

#[when(expr = "the range is changed to {int}")]
async fn range_changed(world: &mut DashboardWorld, count: u32) {
    let engine = world.engine();
    engine.change_range(count).await;
}

#[when(expr = "the data source is switched to {string}")]
async fn source_switched(world: &mut DashboardWorld, source: String) {
    let source = serde_json::from_value(serde_json::json!(source)).expect("unknown source");
    let engine = world.engine();
    engine.toggle_source(source).await;
}

#[then("no temperature is displayed")]
async fn no_temperature(world: &mut DashboardWorld) {
    let engine = world.engine();
    let state = engine.state().read().await;
    assert_eq!(state.display.slot(TEMPERATURE), None);
    assert!(state.snapshot.hourly.is_none());
}

#[then(expr = "the temperature slot shows {string}")]
async fn temperature_shows(world: &mut DashboardWorld, expected: String) {
    let engine = world.engine();
    let state = engine.state().read().await;
    assert_eq!(state.display.slot(TEMPERATURE), Some(expected.as_str()));
}

#[then(expr = "the snapshot holds {int} hourly readings")]
async fn snapshot_holds(world: &mut DashboardWorld, count: usize) {
    let engine = world.engine();
    let state = engine.state().read().await;
    assert_eq!(state.snapshot.hourly.as_ref().map(Vec::len), Some(count));
}

#[then("the loading indicator is hidden")]
fn loading_hidden(world: &mut DashboardWorld) {
    let engine = world.engine();
    assert!(!engine.is_loading());
}

#[then("the last updated time is shown")]
async fn last_updated_shown(world: &mut DashboardWorld) {
    let engine = world.engine();
    let state = engine.state().read().await;
    let label = state.last_updated.as_deref().expect("no last updated label");
    assert!(label.starts_with("Last updated: "), "{label}");
}
