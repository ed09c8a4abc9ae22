//! Table publisher for the vector-store ("LMS") service.
//!
//! Flattens an environment's schemas into one ordered table list and uploads
//! one document per table. Upload failures are recorded in the per-table
//! outcome and never abort the run; there is no retry or backoff.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::config::LmsConfig;
use crate::models::{
    Document, Environment, EnvironmentSummary, PushSummary, Table, TableOutcome,
};

/// Upload failure for a single document.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("vector store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("vector store rejected document ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("environment '{0}' has no tables")]
    NoTablesFound(String),
}

/// Client for the vector-store document-add endpoint.
pub struct LmsClient {
    http: reqwest::Client,
    base_url: String,
}

impl LmsClient {
    pub fn new(config: &LmsConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Uploads one document to `<store>/index/<index>/add`.
    ///
    /// The endpoint accepts a list of documents; the payload here is always a
    /// one-element list. Returns the remote response body verbatim, parsed as
    /// JSON when possible.
    pub async fn add_document(
        &self,
        store_name: &str,
        index_name: &str,
        document: &Document,
    ) -> Result<serde_json::Value, UploadError> {
        let url = format!(
            "{}/api/v1/vector-store/{}/index/{}/add",
            self.base_url, store_name, index_name
        );
        let response = self.http.post(&url).json(&[document]).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UploadError::Rejected { status, body });
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

/// Publishes every table of `environment` into the given store and index.
///
/// Fails with [`PublishError::NoTablesFound`] before any network call when
/// the flattened table list is empty. Otherwise each table gets exactly one
/// upload attempt, in schema-then-table order, and the summary carries one
/// outcome per table.
pub async fn publish(
    client: &LmsClient,
    environment: &Environment,
    store_name: &str,
    index_name: &str,
) -> Result<PushSummary, PublishError> {
    let tables: Vec<&Table> = environment.tables().collect();
    if tables.is_empty() {
        return Err(PublishError::NoTablesFound(environment.name.clone()));
    }

    tracing::info!(
        environment = %environment.name,
        tables = tables.len(),
        store_name,
        index_name,
        "publishing environment tables"
    );

    let mut results = Vec::with_capacity(tables.len());
    for table in tables {
        let outcome = push_one(client, environment, table, store_name, index_name).await;
        results.push(outcome);
    }

    let total_tables = results.len();
    Ok(PushSummary {
        message: format!(
            "Pushed {} tables from environment '{}'",
            total_tables, environment.name
        ),
        environment: EnvironmentSummary {
            name: environment.name.clone(),
            system_name: environment.system_name.clone(),
            total_tables,
        },
        results,
    })
}

async fn push_one(
    client: &LmsClient,
    environment: &Environment,
    table: &Table,
    store_name: &str,
    index_name: &str,
) -> TableOutcome {
    let document = match Document::for_table(environment, table, index_name) {
        Ok(document) => document,
        Err(e) => {
            return TableOutcome::Error {
                table_name: table.name.clone(),
                error_message: format!("failed to serialize document: {e}"),
            }
        }
    };

    match client.add_document(store_name, index_name, &document).await {
        Ok(remote_response) => {
            tracing::debug!(table = %table.name, "document indexed");
            TableOutcome::Success {
                table_name: table.name.clone(),
                column_count: table.columns.len(),
                remote_response,
            }
        }
        Err(e) => {
            tracing::warn!(table = %table.name, error = %e, "document upload failed");
            TableOutcome::Error {
                table_name: table.name.clone(),
                error_message: e.to_string(),
            }
        }
    }
}
