//! Google Distance Matrix lookups

use helpkit_domain::{DistanceMatrixConfig, HelpkitError, Result, TravelMode, UnitSystem};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::HttpClient;

const STATUS_OK: &str = "OK";

/// Travel distance and time between one origin and one destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    pub meters: u64,
    pub seconds: u64,
    /// Localized, e.g. `"465 km"`
    pub distance_text: String,
    /// Localized, e.g. `"4 heures 12 min"`
    pub duration_text: String,
}

impl Distance {
    pub fn kilometers(&self) -> f64 {
        self.meters as f64 / 1000.0
    }

    pub fn minutes(&self) -> u64 {
        self.seconds.div_ceil(60)
    }
}

/// Every origin/destination pair; `None` where no route was found
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DistanceMatrix {
    pub origin_addresses: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub rows: Vec<Vec<Option<Distance>>>,
}

impl DistanceMatrix {
    pub fn get(&self, origin: usize, destination: usize) -> Option<&Distance> {
        self.rows.get(origin)?.get(destination)?.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    origin_addresses: Vec<String>,
    #[serde(default)]
    destination_addresses: Vec<String>,
    #[serde(default)]
    rows: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
struct ApiRow {
    elements: Vec<ApiElement>,
}

#[derive(Debug, Deserialize)]
struct ApiElement {
    status: String,
    distance: Option<ApiValue>,
    duration: Option<ApiValue>,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    text: String,
    value: u64,
}

impl ApiElement {
    fn into_distance(self) -> Option<Distance> {
        if self.status != STATUS_OK {
            return None;
        }
        let (distance, duration) = (self.distance?, self.duration?);
        Some(Distance {
            meters: distance.value,
            seconds: duration.value,
            distance_text: distance.text,
            duration_text: duration.text,
        })
    }
}

/// Client for the Distance Matrix JSON endpoint
pub struct DistanceMatrixClient {
    http_client: HttpClient,
    config: DistanceMatrixConfig,
    units: UnitSystem,
}

impl DistanceMatrixClient {
    pub fn new(config: DistanceMatrixConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout_secs(config.timeout_seconds).build()?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: DistanceMatrixConfig, http_client: HttpClient) -> Self {
        Self { http_client, config, units: UnitSystem::default() }
    }

    /// Unit system of the returned texts; raw values stay in meters
    pub fn units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    /// Route between two addresses, `None` when Google finds none
    pub async fn distance(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Option<Distance>> {
        let mut matrix = self.distances(&[origin], &[destination], mode).await?;
        Ok(matrix.rows.pop().and_then(|mut row| row.pop()).flatten())
    }

    /// Full matrix for several origins and destinations
    ///
    /// # Errors
    /// - `Config` when no API key is configured
    /// - `InvalidInput` for empty address lists or a request Google refuses
    /// - `Network` for quota and availability statuses
    pub async fn distances<S: AsRef<str>>(
        &self,
        origins: &[S],
        destinations: &[S],
        mode: TravelMode,
    ) -> Result<DistanceMatrix> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| HelpkitError::Config("Distance Matrix API key is not configured".into()))?;

        if origins.is_empty() || destinations.is_empty() {
            return Err(HelpkitError::InvalidInput(
                "distance lookup needs at least one origin and one destination".into(),
            ));
        }

        let origins = join_addresses(origins);
        let destinations = join_addresses(destinations);
        let request = self.http_client.request(Method::GET, &self.config.endpoint).query(&[
            ("origins", origins.as_str()),
            ("destinations", destinations.as_str()),
            ("mode", mode.as_str()),
            ("units", self.units.as_str()),
            ("language", self.config.language.as_str()),
            ("key", api_key),
        ]);

        let response: ApiResponse = self.http_client.send_json(request).await?;
        debug!(status = %response.status, %mode, rows = response.rows.len(), "Distance Matrix answered");

        if response.status != STATUS_OK {
            return Err(status_error(&response.status, response.error_message.as_deref()));
        }

        Ok(DistanceMatrix {
            origin_addresses: response.origin_addresses,
            destination_addresses: response.destination_addresses,
            rows: response
                .rows
                .into_iter()
                .map(|row| row.elements.into_iter().map(ApiElement::into_distance).collect())
                .collect(),
        })
    }
}

fn join_addresses<S: AsRef<str>>(addresses: &[S]) -> String {
    addresses.iter().map(|a| a.as_ref().trim()).collect::<Vec<_>>().join("|")
}

fn status_error(status: &str, detail: Option<&str>) -> HelpkitError {
    let message = match detail {
        Some(detail) => format!("Distance Matrix status {status}: {detail}"),
        None => format!("Distance Matrix status {status}"),
    };
    match status {
        "INVALID_REQUEST" | "MAX_ELEMENTS_EXCEEDED" | "MAX_DIMENSIONS_EXCEEDED" => {
            HelpkitError::InvalidInput(message)
        }
        "REQUEST_DENIED" => HelpkitError::Security(message),
        _ => HelpkitError::Network(message),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> DistanceMatrixClient {
        let config = DistanceMatrixConfig {
            api_key: Some("maps-key".into()),
            endpoint: server.uri(),
            ..DistanceMatrixConfig::default()
        };
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");
        DistanceMatrixClient::with_client(config, http_client)
    }

    fn element(meters: u64, seconds: u64) -> serde_json::Value {
        json!({
            "status": "OK",
            "distance": {"text": format!("{} km", meters / 1000), "value": meters},
            "duration": {"text": format!("{} min", seconds / 60), "value": seconds}
        })
    }

    #[tokio::test]
    async fn distance_sends_query_and_reads_first_element() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("origins", "Paris"))
            .and(query_param("destinations", "Lyon"))
            .and(query_param("mode", "bicycling"))
            .and(query_param("language", "fr"))
            .and(query_param("units", "metric"))
            .and(query_param("key", "maps-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "origin_addresses": ["Paris, France"],
                "destination_addresses": ["Lyon, France"],
                "rows": [{"elements": [element(465_000, 15_030)]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let distance = client(&server)
            .distance("Paris", "Lyon", TravelMode::Bicycling)
            .await
            .unwrap()
            .expect("route");
        assert_eq!(distance.meters, 465_000);
        assert!((distance.kilometers() - 465.0).abs() < f64::EPSILON);
        assert_eq!(distance.minutes(), 251);
    }

    #[tokio::test]
    async fn unreachable_pairs_are_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "origin_addresses": ["Paris, France", "Ajaccio, France"],
                "destination_addresses": ["Lyon, France"],
                "rows": [
                    {"elements": [element(465_000, 15_000)]},
                    {"elements": [{"status": "ZERO_RESULTS"}]}
                ]
            })))
            .mount(&server)
            .await;

        let matrix = client(&server)
            .distances(&["Paris", "Ajaccio"], &["Lyon"], TravelMode::Driving)
            .await
            .unwrap();
        assert!(matrix.get(0, 0).is_some());
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(5, 5), None);
        assert_eq!(matrix.origin_addresses[1], "Ajaccio, France");
    }

    #[tokio::test]
    async fn top_level_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "rows": []
            })))
            .mount(&server)
            .await;

        let err = client(&server).distance("Paris", "Lyon", TravelMode::Driving).await.unwrap_err();
        match err {
            HelpkitError::Security(msg) => assert!(msg.contains("API key is invalid")),
            other => panic!("expected security error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_key_and_empty_lists_fail_early() {
        let server = MockServer::start().await;
        let mut client = client(&server);

        let empty: [&str; 0] = [];
        let err = client.distances(&empty, &["Lyon"], TravelMode::Driving).await.unwrap_err();
        assert!(matches!(err, HelpkitError::InvalidInput(_)));

        client.config.api_key = None;
        let err = client.distance("Paris", "Lyon", TravelMode::Driving).await.unwrap_err();
        assert!(matches!(err, HelpkitError::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
