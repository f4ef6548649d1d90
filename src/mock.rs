//! In-process stand-in for the geocoding endpoint. Shared by the unit tests
//! and, through `#[path]`, by the integration tests, so it only depends on
//! external crates.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Router,
};
use reqwest::{StatusCode, Url};
use tokio::net::TcpListener;

type Params = HashMap<String, String>;

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<HashMap<String, (StatusCode, String)>>,
    requests: Arc<Mutex<Vec<(Params, Option<String>)>>>,
}

/// Answers each `q` with its canned response, or `200 []` when it has none.
async fn search(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> (StatusCode, String) {
    let query = params.get("q").cloned().unwrap_or_default();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    state.requests.lock().unwrap().push((params, user_agent));
    state
        .responses
        .get(&query)
        .cloned()
        .unwrap_or_else(|| (StatusCode::OK, "[]".to_string()))
}

pub struct MockServer {
    pub endpoint: Url,
    state: MockState,
}

impl MockServer {
    /// Serve the canned `(q, status, body)` responses on a free local port.
    pub async fn start<'a>(
        responses: impl IntoIterator<Item = (&'a str, StatusCode, &'a str)>,
    ) -> Result<Self> {
        let responses = responses
            .into_iter()
            .map(|(query, status, body)| {
                (query.to_string(), (status, body.to_string()))
            })
            .collect();
        let state = MockState {
            responses: Arc::new(responses),
            ..Default::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new()
            .route("/v1/search.php", get(search))
            .with_state(state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(Self {
            endpoint: Url::parse(&format!("http://{addr}/v1/search.php"))?,
            state,
        })
    }

    /// Query parameters of every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Params> {
        let requests = self.state.requests.lock().unwrap();
        requests.iter().map(|(params, _)| params.clone()).collect()
    }

    /// The `q` parameter of every request received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|mut params| params.remove("q"))
            .collect()
    }

    /// The `User-Agent` of every request received so far, oldest first.
    pub fn user_agents(&self) -> Vec<String> {
        let requests = self.state.requests.lock().unwrap();
        requests
            .iter()
            .filter_map(|(_, user_agent)| user_agent.clone())
            .collect()
    }
}
