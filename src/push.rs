//! Push orchestration: fetch one environment, publish its tables.

use thiserror::Error;

use crate::config::Config;
use crate::fetch::{FetchError, MetadataClient};
use crate::models::{PushRequest, PushSummary};
use crate::publish::{self, LmsClient, PublishError};

#[derive(Debug, Error)]
pub enum PushError {
    /// Environment absent, fetch rejected by the service, or no tables to
    /// publish. Callers cannot tell these apart; the log can.
    #[error("environment '{0}' not found or has no tables")]
    NotFound(String),
    /// Fetch failures that are not collapsed into absence.
    #[error(transparent)]
    Fetch(FetchError),
    #[error("failed to initialize HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Runs one push operation end to end.
///
/// Sequential throughout: one metadata fetch, then one upload per table in
/// flattened order. Per-table upload failures land in the summary's result
/// list and never surface here.
pub async fn run_push(config: &Config, request: &PushRequest) -> Result<PushSummary, PushError> {
    let metadata = MetadataClient::new(&config.metadata).map_err(PushError::Client)?;
    let lms = LmsClient::new(&config.lms).map_err(PushError::Client)?;

    let environment = match metadata.fetch(&request.environment_id).await {
        Ok(Some(environment)) => environment,
        Ok(None) => return Err(PushError::NotFound(request.environment_id.clone())),
        Err(FetchError::RemoteRejected { status, body }) => {
            // A rejected fetch reads as "not found" to callers.
            tracing::warn!(
                environment_id = %request.environment_id,
                %status,
                body = %body,
                "metadata fetch rejected"
            );
            return Err(PushError::NotFound(request.environment_id.clone()));
        }
        Err(e) => return Err(PushError::Fetch(e)),
    };

    match publish::publish(&lms, &environment, &request.store_name, &request.index_name).await {
        Ok(summary) => Ok(summary),
        Err(PublishError::NoTablesFound(_)) => {
            Err(PushError::NotFound(request.environment_id.clone()))
        }
    }
}
