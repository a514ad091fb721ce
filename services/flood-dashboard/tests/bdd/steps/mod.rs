//! BDD step definitions for the flood dashboard

pub mod chart_steps;
pub mod refresh_steps;
pub mod risk_steps;

/// Parse a comma separated list such as "5.0, 6.0, 7.5"
pub fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// JSON array of hourly readings with the given temperatures, one hour apart
pub fn readings_body(temperatures: &[f64], water: bool) -> String {
    let rows: Vec<serde_json::Value> = temperatures
        .iter()
        .enumerate()
        .map(|(i, temperature)| {
            let mut row = serde_json::json!({
                "datetime": 1_700_000_000 + 3600 * i as i64,
                "temperature": temperature,
                "relative_humidity": 50.0 + i as f64,
                "rain": 1.0 + i as f64,
                "soil_moisture": 0.2,
                "surface_pressure": 1000.0,
            });
            if water {
                row["water_flow"] = serde_json::json!(1.5);
                row["water_depth"] = serde_json::json!(0.3);
            }
            row
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}
