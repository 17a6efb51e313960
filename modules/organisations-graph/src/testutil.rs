//! Test doubles for the graph store, plus a real Neo4j instance via
//! testcontainers behind the `test-utils` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{GraphStore, StoreError};

/// One statement as the store received it.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub statement: String,
    pub params: Vec<(String, String)>,
}

/// In-memory store returning canned column values, whatever the statement.
#[derive(Clone, Default)]
pub struct FixtureStore {
    columns: HashMap<String, Vec<Value>>,
    failure: Option<String>,
    recorded: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Values returned for `column`, one per result row.
    pub fn with_column(mut self, column: &str, values: Vec<Value>) -> Self {
        self.columns.insert(column.to_string(), values);
        self
    }

    /// The single `rs` row the organisation traversal returns, holding `rows`.
    pub fn with_organisation_rows(self, rows: Vec<Value>) -> Self {
        self.with_column("rs", vec![Value::Array(rows)])
    }

    /// Result of the connectivity check.
    pub fn with_node_ids(self, ids: Vec<i64>) -> Self {
        self.with_column("id", ids.into_iter().map(Value::from).collect())
    }

    pub fn recorded(&self) -> Vec<RecordedQuery> {
        self.recorded.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for FixtureStore {
    async fn fetch<T>(
        &self,
        statement: &str,
        params: &[(&str, &str)],
        column: &str,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(RecordedQuery {
                statement: statement.to_string(),
                params: params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
        }

        if let Some(message) = &self.failure {
            return Err(StoreError::Unavailable(message.clone()));
        }

        self.columns
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|v| {
                serde_json::from_value(v.clone()).map_err(|e| StoreError::Decode {
                    column: column.to_string(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(feature = "test-utils")]
pub use container::neo4j_container;

#[cfg(feature = "test-utils")]
mod container {
    use testcontainers::{
        core::{ContainerPort, WaitFor},
        runners::AsyncRunner,
        ContainerAsync, GenericImage, ImageExt,
    };

    use crate::GraphClient;

    /// Spin up a Neo4j container and return the container handle + connected GraphClient.
    ///
    /// The container is dropped (and stopped) when `ContainerAsync` goes out of scope,
    /// so callers must hold it alive for the duration of the test.
    pub async fn neo4j_container() -> (ContainerAsync<GenericImage>, GraphClient) {
        let image = GenericImage::new("neo4j", "5.25.1-community")
            .with_exposed_port(ContainerPort::Tcp(7687))
            .with_wait_for(WaitFor::message_on_stdout("Started."))
            .with_env_var("NEO4J_AUTH", "neo4j/testpassword");

        let container: ContainerAsync<GenericImage> = image
            .start()
            .await
            .expect("Failed to start Neo4j container");

        let host_port = container
            .get_host_port_ipv4(7687)
            .await
            .expect("Failed to get Neo4j host port");

        let uri = format!("bolt://127.0.0.1:{host_port}");
        let client = GraphClient::connect(&uri, "neo4j", "testpassword")
            .await
            .expect("Failed to connect to Neo4j");

        (container, client)
    }
}
