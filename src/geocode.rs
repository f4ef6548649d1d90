//! Client for the LocationIQ forward geocoding endpoint.

use std::time::Duration;

use anyhow::Context;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, StatusCode, Url,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://us1.locationiq.com/v1/search.php";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), " / ", env!("CARGO_PKG_VERSION"));

/// A latitude/longitude pair, kept as the exact decimal strings the service
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Parse the coordinate as a GeoJSON position, i.e. `[lng, lat]`.
    pub fn to_position(&self) -> Result<Vec<f64>, LookupError> {
        let lat = parse_degrees("lat", &self.latitude)?;
        let lng = parse_degrees("lon", &self.longitude)?;
        Ok(vec![lng, lat])
    }
}

/// Parse a finite number of degrees. `NaN` and infinities parse as `f64` but
/// have no place on a map.
fn parse_degrees(field: &str, value: &str) -> Result<f64, LookupError> {
    let malformed = |reason: String| {
        LookupError::MalformedResponse(format!("{field} {value:?} {reason}"))
    };
    let degrees = value
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(format!("is not a number: {e}")))?;
    if !degrees.is_finite() {
        return Err(malformed("is not finite".to_string()));
    }
    Ok(degrees)
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("geocoding service answered with {0}")]
    Status(StatusCode),

    #[error("no results for {0:?}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LookupError {
    /// The request URL carries the API key, so it's stripped.
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.without_url())
    }
}

/// The fields we read from a single search result. LocationIQ sends many more.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Parse a search response body and take the first result.
fn first_coordinate(
    query: &str,
    body: &str,
) -> Result<Coordinate, LookupError> {
    let places: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| {
            LookupError::MalformedResponse(format!(
                "expected a JSON array: {e}"
            ))
        })?;
    let Some(first) = places.into_iter().next() else {
        return Err(LookupError::NotFound(query.to_string()));
    };
    let place = Place::deserialize(first).map_err(|e| {
        LookupError::MalformedResponse(format!("first result: {e}"))
    })?;
    Ok(Coordinate {
        latitude: place.lat,
        longitude: place.lon,
    })
}

/// Holds the HTTP connection pool and the credential. Not `Debug`: the key
/// must never reach the logs.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );
        let client = Client::builder()
            .gzip(true)
            .use_rustls_tls()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build an HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Look up `query` and return the coordinate of the first match.
    #[instrument(skip_all, fields(query = query))]
    pub async fn lookup(
        &self,
        query: &str,
    ) -> Result<Coordinate, LookupError> {
        info!("🔎 Looking up…");
        let params = [
            ("key", self.api_key.as_str()),
            ("q", query),
            ("format", "json"),
        ];
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        // LocationIQ reports "Unable to geocode" as a 404.
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(query.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.text().await?;
        let coordinate = first_coordinate(query, &body)?;
        debug!(
            lat = %coordinate.latitude,
            lon = %coordinate.longitude,
            "📍 Found",
        );
        Ok(coordinate)
    }
}
