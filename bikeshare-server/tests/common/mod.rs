//! A local stand-in for the upstream GBFS feed.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{Router, extract::State, http::StatusCode, routing::get};
use bikeshare_server::gbfs::DEFAULT_STATIONS;
use serde_json::{Value, json};

/// What one mocked document currently returns.
#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn ok(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    info: Arc<Mutex<Reply>>,
    status: Arc<Mutex<Reply>>,
    info_hits: Arc<AtomicUsize>,
    status_hits: Arc<AtomicUsize>,
}

/// A running mock feed server.
pub struct MockFeed {
    pub base_url: String,
    state: MockState,
}

impl MockFeed {
    /// Serve the standard fixture: seven allow-listed stations plus a few
    /// others, with status for only five of the allow-listed ones.
    pub async fn start() -> Self {
        Self::start_with(&station_information(), &station_status()).await
    }

    pub async fn start_with(info: &Value, status: &Value) -> Self {
        let state = MockState {
            info: Arc::new(Mutex::new(Reply::ok(info))),
            status: Arc::new(Mutex::new(Reply::ok(status))),
            info_hits: Arc::new(AtomicUsize::new(0)),
            status_hits: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/gbfs/en/station_information.json", get(serve_info))
            .route("/gbfs/en/station_status.json", get(serve_status))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/gbfs/en"),
            state,
        }
    }

    pub fn info_hits(&self) -> usize {
        self.state.info_hits.load(Ordering::SeqCst)
    }

    pub fn status_hits(&self) -> usize {
        self.state.status_hits.load(Ordering::SeqCst)
    }

    /// Make the information document answer with a raw status and body.
    pub fn set_info(&self, status: StatusCode, body: impl Into<String>) {
        *self.state.info.lock().unwrap() = Reply {
            status,
            body: body.into(),
        };
    }

    /// Make the status document answer with a raw status and body.
    pub fn set_status(&self, status: StatusCode, body: impl Into<String>) {
        *self.state.status.lock().unwrap() = Reply {
            status,
            body: body.into(),
        };
    }
}

async fn serve_info(State(state): State<MockState>) -> (StatusCode, String) {
    state.info_hits.fetch_add(1, Ordering::SeqCst);
    let reply = state.info.lock().unwrap().clone();
    (reply.status, reply.body)
}

async fn serve_status(State(state): State<MockState>) -> (StatusCode, String) {
    state.status_hits.fetch_add(1, Ordering::SeqCst);
    let reply = state.status.lock().unwrap().clone();
    (reply.status, reply.body)
}

/// Upstream id of the n-th allow-listed station.
pub fn station_id(n: usize) -> String {
    format!("uuid-{n}")
}

/// Seven allow-listed stations (capacity 10, 20, ... 70) plus two outside
/// the allow-list and one malformed row.
pub fn station_information() -> Value {
    let mut stations: Vec<Value> = DEFAULT_STATIONS
        .iter()
        .enumerate()
        .map(|(n, short_name)| {
            json!({
                "station_id": station_id(n),
                "short_name": short_name,
                "name": format!("Station {n}"),
                "lat": 40.80 + n as f64 * 0.001,
                "lon": -73.96,
                "capacity": (n as u32 + 1) * 10,
                "region_id": "71"
            })
        })
        .collect();

    stations.push(json!({
        "station_id": "elsewhere-1",
        "short_name": "5000.01",
        "name": "Far Away",
        "lat": 40.70,
        "lon": -74.0,
        "capacity": 15
    }));
    stations.push(json!({
        "station_id": "elsewhere-2",
        "name": "No Short Name",
        "lat": 40.71,
        "lon": -74.0,
        "capacity": 9
    }));
    // Decommissioned: no name, no position, nonsense capacity
    stations.push(json!({
        "station_id": "broken-1",
        "short_name": "5000.02",
        "lat": null,
        "lon": null,
        "capacity": -3
    }));

    json!({ "last_updated": 1_700_000_000, "ttl": 5, "data": { "stations": stations } })
}

/// Status for allow-listed stations 0..5 (bikes = n + 1, one e-bike each),
/// for both outside stations, and one malformed row; stations 5 and 6 have
/// none.
pub fn station_status() -> Value {
    let mut stations: Vec<Value> = (0..5)
        .map(|n| {
            json!({
                "station_id": station_id(n),
                "num_bikes_available": n + 1,
                "num_ebikes_available": 1,
                "num_docks_available": 5,
                "is_installed": 1,
                "is_renting": 1,
                "is_returning": 1,
                "last_reported": 1_700_000_000 + n as i64
            })
        })
        .collect();

    for id in ["elsewhere-1", "elsewhere-2"] {
        stations.push(json!({
            "station_id": id,
            "num_bikes_available": 4,
            "num_ebikes_available": 0,
            "num_docks_available": 4,
            "is_installed": true,
            "is_renting": true,
            "is_returning": false,
            "last_reported": 1_800_000_000
        }));
    }
    stations.push(json!({
        "station_id": "broken-1",
        "num_bikes_available": -1,
        "num_docks_available": null
    }));

    json!({ "last_updated": 1_700_000_010, "ttl": 5, "data": { "stations": stations } })
}
