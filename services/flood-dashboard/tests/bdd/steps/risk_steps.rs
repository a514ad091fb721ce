//! BDD step definitions for risk indicators

use cucumber::{given, then};

use flood_dashboard::render::{
    CURRENT_RISK, FORECAST_24H, FORECAST_48H, INDICATOR_24H, INDICATOR_48H, INDICATOR_CURRENT,
};

use crate::world::{ok, DashboardWorld};

/// Numbers go on the wire as numbers, anything else as a JSON string
fn wire_code(code: &str) -> serde_json::Value {
    match code.parse::<i64>() {
        Ok(n) => serde_json::json!(n),
        Err(_) => serde_json::json!(code),
    }
}

#[given(expr = "the daily prediction endpoint reports risks {string} and {string}")]
fn daily_prediction(world: &mut DashboardWorld, risk_24: String, risk_48: String) {
    let body = serde_json::json!([
        {"prediction_24": 0, "prediction_48": 0},
        {"prediction_24": wire_code(&risk_24), "prediction_48": wire_code(&risk_48)}
    ]);
    world.http.push("prediction", ok(body.to_string()));
}

#[given(expr = "the hourly prediction endpoint reports risk {string}")]
fn hourly_prediction(world: &mut DashboardWorld, risk: String) {
    let body = serde_json::json!([{"prediction_24": wire_code(&risk), "prediction_48": 0}]);
    world.http.push("hourly_prediction", ok(body.to_string()));
}

fn slots(horizon: &str) -> (&'static str, &'static str) {
    match horizon {
        "24 hour" => (FORECAST_24H, INDICATOR_24H),
        "48 hour" => (FORECAST_48H, INDICATOR_48H),
        "current" => (CURRENT_RISK, INDICATOR_CURRENT),
        other => panic!("Unknown horizon: {}", other),
    }
}

#[then(expr = "the {string} forecast reads {string}")]
async fn forecast_reads(world: &mut DashboardWorld, horizon: String, label: String) {
    let (text_slot, _) = slots(&horizon);
    let engine = world.engine();
    let state = engine.state().read().await;
    assert_eq!(state.display.slot(text_slot), Some(label.as_str()));
}

#[then(expr = "the {string} indicator has class {string} and shows {string}")]
async fn indicator_shows(
    world: &mut DashboardWorld,
    horizon: String,
    class: String,
    content: String,
) {
    let (_, indicator_slot) = slots(&horizon);
    let engine = world.engine();
    let state = engine.state().read().await;
    let indicator = state
        .display
        .indicator(indicator_slot)
        .expect("indicator not rendered");
    assert_eq!(indicator.class, class);
    let shown = indicator
        .icon
        .as_deref()
        .or(indicator.text.as_deref())
        .unwrap_or_default();
    assert_eq!(shown, content);
}
