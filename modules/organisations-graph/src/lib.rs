pub mod client;
mod mapper;
mod traversal;
pub mod reader;
pub mod store;

#[cfg(any(test, feature = "fixtures"))]
pub mod testutil;

pub use client::GraphClient;
pub use neo4rs::query;
pub use reader::{OrganisationReader, ReadError};
pub use store::{GraphStore, StoreError};
