use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use organisations_common::{IdentityMapper, Organisation};

use crate::mapper::to_organisation;
use crate::traversal::fetch_organisation_rows;
use crate::{GraphStore, StoreError};

const CONNECTIVITY_CHECK: &str = "MATCH (x) RETURN ID(x) AS id LIMIT 1";

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Error accessing Organisation datastore for uuid: {uuid}")]
    StoreUnavailable {
        uuid: String,
        #[source]
        source: StoreError,
    },

    /// The key matched several organisation nodes. Nothing is returned, the
    /// stored data needs fixing.
    #[error("Multiple organisations ({count}) found with the same uuid: {uuid}")]
    MultiplicityConflict { uuid: String, count: usize },

    #[error("Cannot reach the graph store: {0}")]
    Unreachable(#[source] StoreError),

    #[error("Graph store is reachable but holds no nodes")]
    NoNodes,
}

impl ReadError {
    /// Whether the read matched stored data despite failing.
    pub fn found(&self) -> bool {
        matches!(self, ReadError::MultiplicityConflict { .. })
    }
}

/// Read-only access to organisation aggregates. The only entry point the HTTP
/// layer uses.
pub struct OrganisationReader<S> {
    store: S,
    uris: Arc<dyn IdentityMapper>,
}

impl<S: GraphStore> OrganisationReader<S> {
    pub fn new(store: S, uris: Arc<dyn IdentityMapper>) -> Self {
        Self { store, uris }
    }

    /// Look up one organisation by uuid.
    ///
    /// `Ok(None)` when nothing matches. More than one matching root node is
    /// reported as [`ReadError::MultiplicityConflict`] rather than picking one.
    pub async fn read(&self, uuid: &str) -> Result<Option<Organisation>, ReadError> {
        info!(uuid, "Reading organisation");

        let mut rows = fetch_organisation_rows(&self.store, uuid)
            .await
            .map_err(|source| {
                error!(uuid, error = %source, "Organisation query failed");
                ReadError::StoreUnavailable {
                    uuid: uuid.to_string(),
                    source,
                }
            })?;

        match rows.len() {
            0 => {
                debug!(uuid, "No organisation found");
                Ok(None)
            }
            1 => {
                let raw = rows.remove(0);
                debug!(uuid, memberships = raw.m.len(), "Mapping organisation row");
                Ok(Some(to_organisation(raw, self.uris.as_ref())))
            }
            count => {
                warn!(uuid, count, "Multiple organisations found with the same uuid");
                Err(ReadError::MultiplicityConflict {
                    uuid: uuid.to_string(),
                    count,
                })
            }
        }
    }

    /// Succeeds when at least one node in the store can be reached.
    pub async fn check_connectivity(&self) -> Result<(), ReadError> {
        let ids: Vec<i64> = self
            .store
            .fetch(CONNECTIVITY_CHECK, &[], "id")
            .await
            .map_err(ReadError::Unreachable)?;
        debug!(nodes = ids.len(), "Connectivity check");
        if ids.is_empty() {
            return Err(ReadError::NoNodes);
        }
        Ok(())
    }
}
