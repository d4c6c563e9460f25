use crate::source::FeedSource;
use crate::workflow::config::FeedConfig;
use async_trait::async_trait;
use icaocore::feed::Snapshot;
use icaocore::prelude::FeedError;
use reqwest::header::USER_AGENT;

/// Client for the Virtual Radar Server `AircraftList.json` endpoint.
pub struct VrsSource {
    client: reqwest::Client,
    url: String,
    query: Vec<(&'static str, String)>,
}

impl VrsSource {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FeedError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            query: geofence_query(config),
        })
    }
}

/// Distance filter around the geofence center, lower bound 0.
pub fn geofence_query(config: &FeedConfig) -> Vec<(&'static str, String)> {
    vec![
        ("lat", config.latitude.to_string()),
        ("lng", config.longitude.to_string()),
        ("fDstL", "0".to_string()),
        ("fDstU", config.radius_km.to_string()),
    ]
}

#[async_trait]
impl FeedSource for VrsSource {
    async fn fetch(&self) -> Result<Snapshot, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .query(&self.query)
            .header(USER_AGENT, "Mozilla/5.0")
            .send()
            .await
            .map_err(|e| FeedError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Http(format!("failed to read response: {}", e)))?;
        Snapshot::from_json(&body)
    }
}
