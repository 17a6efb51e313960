use std::sync::{Arc, LazyLock};

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::{error, info, warn};

use organisations_common::OrganisationsError;
use organisations_graph::GraphStore;

use crate::AppState;

const JSON_UTF8: &str = "application/json; charset=UTF-8";

static CANONICAL_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})$",
    )
    .unwrap()
});

fn json_message(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "message": message }).to_string();
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        body,
    )
        .into_response()
}

/// Where a request made with a non-canonical `requested` key should go.
///
/// `None` when `requested` already appears in `canonical_id`, or when the id
/// carries no uuid to redirect to.
pub fn canonical_redirect(requested: &str, canonical_id: &str, request_uri: &str) -> Option<String> {
    if canonical_id.contains(requested) {
        return None;
    }
    let canonical = CANONICAL_UUID.find(canonical_id)?.as_str();
    Some(request_uri.replacen(requested, canonical, 1))
}

fn validate_uuid(uuid: &str) -> Result<&str, OrganisationsError> {
    if uuid.trim().is_empty() {
        return Err(OrganisationsError::Validation("uuid required".to_string()));
    }
    Ok(uuid)
}

pub async fn get_organisation<S: GraphStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(uuid): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let uuid = match validate_uuid(&uuid) {
        Ok(uuid) => uuid,
        Err(e) => return json_message(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let organisation = match state.reader.read(uuid).await {
        Ok(Some(organisation)) => organisation,
        Ok(None) => return json_message(StatusCode::NOT_FOUND, "Organisation not found."),
        Err(e) => {
            error!(uuid, found = e.found(), error = %e, "Failed to read organisation");
            return json_message(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    if let Some(location) = canonical_redirect(uuid, &organisation.id, request_uri) {
        info!(uuid, %location, "Redirecting to canonical organisation");
        return (
            StatusCode::MOVED_PERMANENTLY,
            [
                (header::CONTENT_TYPE, JSON_UTF8),
                (header::LOCATION, location.as_str()),
            ],
        )
            .into_response();
    }
    if !organisation.id.contains(uuid) {
        warn!(uuid, id = %organisation.id, "Canonical id carries no uuid, serving as is");
    }

    match serde_json::to_vec(&organisation) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8)),
                (header::CACHE_CONTROL, state.cache_control.clone()),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(uuid, error = %e, "Failed to serialize organisation");
            json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Organisation could not be marshalled, err={e}"),
            )
        }
    }
}
