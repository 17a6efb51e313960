pub mod concept_uris;
pub mod config;
pub mod error;
pub mod types;

pub use concept_uris::{ConceptIdentity, ConceptUris, IdentityMapper};
pub use config::Config;
pub use error::OrganisationsError;
pub use types::*;
