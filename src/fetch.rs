//! Environment fetcher for the remote metadata-management service.
//!
//! One outbound `GET` per fetch. The service answers with an envelope of the
//! form `{"data": [ <environment>, ... ]}`; only the first element is
//! consumed. An empty `data` array means the environment does not exist,
//! which is distinct from the transport and rejection failures in
//! [`FetchError`]; collapsing those into "not found" is the orchestration
//! layer's call, not the fetcher's.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MetadataConfig;
use crate::models::Environment;

/// Failure modes of one metadata fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP exchange itself failed (connect, timeout, broken transfer).
    #[error("metadata service unreachable: {0}")]
    RemoteUnavailable(#[from] reqwest::Error),
    /// The service answered with a non-2xx status.
    #[error("metadata service rejected request ({status}): {body}")]
    RemoteRejected { status: StatusCode, body: String },
    /// The response body did not match the expected environment shape.
    #[error("malformed metadata payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct EnvironmentEnvelope {
    data: Vec<Environment>,
}

/// Client for the metadata manager's environments endpoint.
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
    fill_options: u32,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
            fill_options: config.fill_options,
        })
    }

    /// Fetches the environment described by `environment_id`.
    ///
    /// Returns `Ok(None)` when the service answered normally but listed no
    /// match. When the response carries more than one match, the first wins
    /// and the rest are discarded.
    pub async fn fetch(&self, environment_id: &str) -> Result<Option<Environment>, FetchError> {
        tracing::info!(environment_id, "fetching environment metadata");

        let url = format!("{}/api/metadatamanager/environments", self.base_url);
        let fill_options = self.fill_options.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("environmentIds", environment_id),
                ("fillOptions", fill_options.as_str()),
            ])
            .header("Authorization", &self.auth_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::RemoteRejected { status, body });
        }

        let envelope: EnvironmentEnvelope = serde_json::from_str(&body)?;
        let mut matches = envelope.data.into_iter();
        let first = matches.next();
        let discarded = matches.count();
        if discarded > 0 {
            // The service can list several environments for one id; first wins.
            tracing::debug!(environment_id, discarded, "extra environment matches discarded");
        }

        Ok(first)
    }
}
