//! Karaoke service API client
//!
//! Thin HTTP client for the external video-to-karaoke processor. The
//! service owns all job execution; this client only submits requests and
//! reads status snapshots.

use super::JobSnapshot;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Karaoke client errors
#[derive(Debug, Error)]
pub enum KaraokeClientError {
    /// The request did not complete (connect, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("Karaoke service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not a valid job snapshot
    #[error("Failed to parse karaoke service response: {0}")]
    Parse(String),
}

/// Creation request for the karaoke service.
///
/// Optional fields are omitted from the wire entirely rather than sent as
/// empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KaraokeRequest {
    pub youtube_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

/// Karaoke service API client
pub struct KaraokeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl KaraokeClient {
    /// Create a client for the service at `base_url` (no trailing slash
    /// required).
    pub fn new(base_url: &str) -> Result<Self, KaraokeClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KaraokeClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit a creation request; the response is the job's initial
    /// snapshot. On any error no job exists.
    pub async fn submit(&self, request: &KaraokeRequest) -> Result<JobSnapshot, KaraokeClientError> {
        let url = format!("{}/api/create-karaoke", self.base_url);

        tracing::debug!(url = %url, youtube_url = %request.youtube_url, "Submitting karaoke creation job");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| KaraokeClientError::Network(e.to_string()))?;

        let snapshot = Self::read_snapshot(response).await?;

        tracing::info!(
            job_id = %snapshot.job_id,
            status = ?snapshot.status,
            "Karaoke creation job submitted"
        );

        Ok(snapshot)
    }

    /// Fetch the current snapshot for an existing job.
    pub async fn poll(&self, job_id: &str) -> Result<JobSnapshot, KaraokeClientError> {
        let url = format!("{}/api/job/{}", self.base_url, job_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| KaraokeClientError::Network(e.to_string()))?;

        Self::read_snapshot(response).await
    }

    async fn read_snapshot(response: reqwest::Response) -> Result<JobSnapshot, KaraokeClientError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KaraokeClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| KaraokeClientError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = KaraokeClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_request_omits_absent_optionals() {
        let request = KaraokeRequest {
            youtube_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            lyrics: None,
            title: Some("My Song".to_string()),
            artist: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("lyrics").is_none());
        assert!(json.get("artist").is_none());
        assert_eq!(json["title"], "My Song");
    }
}
