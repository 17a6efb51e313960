use serde::{Deserialize, Serialize};

// --- Organisation aggregate ---

/// An organisation with its memberships, as served by `/organisations/{uuid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: String,
    pub api_url: String,
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lei_code: Option<String>,
    pub pref_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    /// Not populated yet: the graph query returns the parent but it is not attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_organisation: Option<OrganisationSummary>,
    /// Not populated yet, same as `parent_organisation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsidiaries: Option<Vec<OrganisationSummary>>,
}

/// Identity-only view of a related organisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationSummary {
    pub id: String,
    pub api_url: String,
    pub types: Vec<String>,
    pub pref_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub title: String,
    pub person: Person,
    #[serde(default)]
    pub change_events: Vec<ChangeEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub api_url: String,
    pub types: Vec<String>,
    pub pref_label: String,
}

/// One endpoint of a membership's tenure. Serializes as `{"startedAt": ..}`
/// or `{"endedAt": ..}`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    #[serde(rename = "startedAt")]
    Started(String),
    #[serde(rename = "endedAt")]
    Ended(String),
}

impl ChangeEvent {
    pub fn started_at(&self) -> Option<&str> {
        match self {
            ChangeEvent::Started(at) => Some(at),
            ChangeEvent::Ended(_) => None,
        }
    }

    pub fn ended_at(&self) -> Option<&str> {
        match self {
            ChangeEvent::Ended(at) => Some(at),
            ChangeEvent::Started(_) => None,
        }
    }
}
