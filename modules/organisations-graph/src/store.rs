//! The narrow contract the reader needs from a graph database: run one
//! parameterized statement and decode one column of every returned row.

use async_trait::async_trait;
use neo4rs::query;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::GraphClient;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Could not decode column {column}: {message}")]
    Decode { column: String, message: String },

    #[error("Graph store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// Run `statement` with `params` and decode `column` from every row, in row order.
    async fn fetch<T>(
        &self,
        statement: &str,
        params: &[(&str, &str)],
        column: &str,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn fetch<T>(
        &self,
        statement: &str,
        params: &[(&str, &str)],
        column: &str,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut q = query(statement);
        for (key, value) in params {
            q = q.param(key, *value);
        }

        let mut values = Vec::new();
        let mut stream = self.graph.execute(q).await?;
        while let Some(row) = stream.next().await? {
            let value: T = row.get(column).map_err(|e| StoreError::Decode {
                column: column.to_string(),
                message: e.to_string(),
            })?;
            values.push(value);
        }
        Ok(values)
    }
}
