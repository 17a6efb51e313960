use axum::http::HeaderValue;

use organisations_graph::OrganisationReader;

/// Shared, read-only request state. Built once at startup.
pub struct AppState<S> {
    pub reader: OrganisationReader<S>,
    /// `Cache-Control` value sent with every successful organisation read.
    pub cache_control: HeaderValue,
}

impl<S> AppState<S> {
    pub fn new(reader: OrganisationReader<S>, cache_control: HeaderValue) -> Self {
        Self {
            reader,
            cache_control,
        }
    }
}
