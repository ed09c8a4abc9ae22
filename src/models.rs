//! Core data models used throughout lms-bridge.
//!
//! These types mirror the metadata manager's wire shapes (camelCase field
//! names) on one side and the vector-store document shape on the other.

use serde::{Deserialize, Serialize};

/// A described column within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "columnName")]
    pub name: String,
    #[serde(rename = "columnDatatype")]
    pub datatype: String,
}

/// A described relational table. Column order is insertion order from the
/// source payload and is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(rename = "tableName")]
    pub name: String,
    #[serde(rename = "tableComments", default)]
    pub comments: Option<String>,
    pub columns: Vec<Column>,
}

/// A grouping of tables within an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

/// A described data system instance. Root entity of one fetch-then-push
/// operation; it has no identity beyond that operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub node_id: String,
    pub name: String,
    pub system_id: i64,
    pub system_name: String,
    pub schemas: Vec<Schema>,
}

impl Environment {
    /// All tables across all schemas, in schema order then table order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.schemas.iter().flat_map(|s| s.tables.iter())
    }

    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }

    /// Trimmed identity embedded in each uploaded document.
    pub fn identity(&self) -> EnvironmentIdentity {
        EnvironmentIdentity {
            node_id: self.node_id.clone(),
            name: self.name.clone(),
            system_id: self.system_id,
            system_name: self.system_name.clone(),
        }
    }
}

/// Environment identity without the schema graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentIdentity {
    pub node_id: String,
    pub name: String,
    pub system_id: i64,
    pub system_name: String,
}

/// Caller-supplied configuration for one push operation. Store and index
/// default from configuration when the caller omits them.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub environment_id: String,
    pub store_name: String,
    pub index_name: String,
}

/// Payload serialized into a document's `page_content` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub table: Table,
    pub environment: EnvironmentIdentity,
}

/// Document shape expected by the vector-store `add` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// JSON-serialized [`PageContent`].
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub index_name: String,
    pub metadata: TableMeta,
}

/// Flat per-table metadata carried alongside the page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMeta {
    pub system_name: String,
    pub environment_name: String,
    pub table_name: String,
    pub table_comments: Option<String>,
    pub column_count: usize,
}

impl Document {
    /// Builds the upload document for one table of an environment.
    ///
    /// `page_content` carries the full table record plus the environment
    /// identity; the metadata block repeats the display fields the index
    /// filters on.
    pub fn for_table(
        environment: &Environment,
        table: &Table,
        index_name: &str,
    ) -> Result<Self, serde_json::Error> {
        let page = PageContent {
            table: table.clone(),
            environment: environment.identity(),
        };
        Ok(Self {
            page_content: serde_json::to_string(&page)?,
            metadata: DocumentMetadata {
                index_name: index_name.to_string(),
                metadata: TableMeta {
                    system_name: environment.system_name.clone(),
                    environment_name: environment.name.clone(),
                    table_name: table.name.clone(),
                    table_comments: table.comments.clone(),
                    column_count: table.columns.len(),
                },
            },
        })
    }
}

/// Per-table outcome of a push. Serializes with a `status` discriminant so
/// callers can filter successes from failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TableOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        table_name: String,
        column_count: usize,
        /// Verbatim response body from the vector-store service.
        remote_response: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        table_name: String,
        error_message: String,
    },
}

impl TableOutcome {
    pub fn table_name(&self) -> &str {
        match self {
            TableOutcome::Success { table_name, .. } => table_name,
            TableOutcome::Error { table_name, .. } => table_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TableOutcome::Success { .. })
    }
}

/// Aggregate result of one push operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSummary {
    pub message: String,
    pub environment: EnvironmentSummary,
    pub results: Vec<TableOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    pub name: String,
    pub system_name: String,
    pub total_tables: usize,
}
