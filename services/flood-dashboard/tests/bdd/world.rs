//! BDD test world for the flood dashboard

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::World;
use flood_dashboard::engine::Engine;
use flood_dashboard::fetcher::FloodApiClient;
use flood_dashboard::io::{HttpClient, HttpResponse};
use flood_dashboard::model::{ChartType, SourceKind};
use flood_dashboard::state::new_state_handle;
use flood_dashboard::FetchError;
use tokio_util::sync::CancellationToken;

pub const BASE_URL: &str = "http://flood.test:5000";

/// Serves queued responses per endpoint. The last queued response sticks.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    scripts: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedHttpClient {
    pub fn push(&self, endpoint: &str, response: HttpResponse) {
        self.scripts
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let endpoint = url
            .trim_start_matches(BASE_URL)
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(&endpoint) {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap()),
            Some(queue) if !queue.is_empty() => Ok(queue[0].clone()),
            _ => Err(FetchError::Network(format!("no script for {}", url))),
        }
    }
}

pub fn ok(body: String) -> HttpResponse {
    HttpResponse { status: 200, body }
}

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    pub http: Arc<ScriptedHttpClient>,
    pub engine: Option<Arc<Engine>>,
    pub calls_before_action: usize,
}

impl DashboardWorld {
    /// Build the engine lazily so every Given step can script responses first
    pub fn engine(&mut self) -> Arc<Engine> {
        if self.engine.is_none() {
            let http: Arc<dyn HttpClient> = Arc::clone(&self.http) as Arc<dyn HttpClient>;
            let api = FloodApiClient::new(BASE_URL, http);
            let state = new_state_handle(SourceKind::Hourly, ChartType::All, 10, true);
            self.engine = Some(Arc::new(Engine::new(
                api,
                state,
                Duration::from_secs(300),
                CancellationToken::new(),
            )));
        }
        Arc::clone(self.engine.as_ref().unwrap())
    }
}
