//! HTTP client for the flight API
//!
//!  Every lookup degrades instead of failing: an empty snapshot, no detail,
//!  or the bundled placeholder picture. Errors are logged here and never
//!  reach the caller.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::flight::{AircraftSnapshotEntry, FlightDetail, PictureResponse, decode_snapshot};

pub const DEFAULT_PLANE_PICTURE: &str = "./images/default_plane.jpg";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the airplane photo comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirplanePicture {
    Remote(String),
    Fallback,
}

impl AirplanePicture {
    pub fn url(&self) -> &str {
        match self {
            AirplanePicture::Remote(url) => url,
            AirplanePicture::Fallback => DEFAULT_PLANE_PICTURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlightDataSource {
    client: reqwest::Client,
    api_url: Url,
}

impl FlightDataSource {
    pub fn new(api_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("flighttrack-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api_url = Url::parse(api_url.trim_end_matches('/')).map_err(|e| FetchError::InvalidUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: api_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(Self { client, api_url })
    }

    /// `api_url` with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Full snapshot of tracked aircraft, empty on any failure
    pub async fn get_flights(&self) -> Vec<AircraftSnapshotEntry> {
        let request = self.client.get(self.endpoint(&["flights"]));
        match self.fetch_json::<Vec<Value>>(request).await {
            Ok(values) => {
                let total = values.len();
                let flights = decode_snapshot(values);
                debug!("Fetched {} aircraft ({} unreadable)", flights.len(), total - flights.len());
                flights
            }
            Err(e) => {
                warn!("Failed to fetch flights: {}", e);
                Vec::new()
            }
        }
    }

    /// Detail record for one aircraft, `None` on any failure
    pub async fn get_flight_info(&self, hex: &str) -> Option<FlightDetail> {
        let request = self
            .client
            .get(self.endpoint(&["flight", ""]))
            .query(&[("hex", hex)]);
        match self.fetch_json::<FlightDetail>(request).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!("Failed to fetch flight info for {}: {}", hex, e);
                None
            }
        }
    }

    pub async fn get_airplane_picture(&self, registration: &str) -> AirplanePicture {
        let request = self
            .client
            .get(self.endpoint(&["airplane", "picture", registration]));
        match self.fetch_json::<PictureResponse>(request).await {
            Ok(PictureResponse {
                picture: Some(picture),
            }) if !picture.is_empty() => AirplanePicture::Remote(picture),
            Ok(_) => {
                debug!("No picture for {}", registration);
                AirplanePicture::Fallback
            }
            Err(e) => {
                debug!("Picture lookup for {} failed: {}", registration, e);
                AirplanePicture::Fallback
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: response.url().to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
