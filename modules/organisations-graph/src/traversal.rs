//! The single Cypher traversal behind an organisation read, and the raw
//! nested row shape it projects.

use serde::{Deserialize, Deserializer};

use crate::{GraphStore, StoreError};

/// Gathers the organisation, its memberships (each with one person and a
/// `[start, end]` change-event pair), its parent and its subsidiaries.
///
/// Memberships, parent and subsidiaries are aggregated in separate stages so
/// none of them multiplies another; only several `Organisation` nodes sharing
/// the uuid can produce more than one entry in `rs`. Every match after the
/// first is optional, so a missing relation shows up as a null-filled entry
/// rather than suppressing the row.
pub(crate) const ORGANISATION_BY_UUID: &str = "
    MATCH (o:Organisation {uuid: $uuid})
    OPTIONAL MATCH (o)<-[:HAS_ORGANISATION]-(m:Membership)
    OPTIONAL MATCH (m)-[:HAS_MEMBER]->(p:Person)
    OPTIONAL MATCH (p)<-[:MENTIONS]-(c:Content)
    WITH o, m, p, count(c) AS annCount
    ORDER BY m.inceptionDate, m.uuid
    WITH o, collect({
        m: {id: m.uuid, prefLabel: m.prefLabel,
            changeEvents: [{startedAt: m.inceptionDate}, {endedAt: m.terminationDate}]},
        p: {id: p.uuid, types: labels(p), prefLabel: p.prefLabel, annCount: annCount}
    }) AS m
    OPTIONAL MATCH (o)-[:SUB_ORGANISATION_OF]->(parent:Organisation)
    WITH o, m, head(collect({id: parent.uuid, types: labels(parent), prefLabel: parent.prefLabel})) AS parent
    OPTIONAL MATCH (o)<-[:SUB_ORGANISATION_OF]-(sub:Organisation)
    WITH o, m, parent, collect({id: sub.uuid, types: labels(sub), prefLabel: sub.prefLabel}) AS sub
    RETURN collect({
        o: {id: o.uuid, types: labels(o), leiCode: o.leiCode, prefLabel: o.prefLabel, labels: o.aliases},
        m: m,
        parent: parent,
        sub: sub
    }) AS rs";

/// Cypher nulls decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawOrganisationRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub o: RawRoot,
    #[serde(default, deserialize_with = "null_as_default")]
    pub m: Vec<RawMembershipEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent: RawConcept,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub: Vec<RawConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRoot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lei_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pref_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
}

/// Parent, subsidiary or any other bare concept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawConcept {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pref_label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawMembershipEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub m: RawMembership,
    #[serde(default, deserialize_with = "null_as_default")]
    pub p: RawPerson,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMembership {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pref_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub change_events: Vec<RawChangeEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPerson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pref_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ann_count: i64,
}

/// One half of the `[{startedAt}, {endedAt}]` pair projected per membership.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawChangeEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub started_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ended_at: String,
}

/// Run the organisation traversal for `uuid`, flattening `rs` across result rows.
pub(crate) async fn fetch_organisation_rows<S: GraphStore>(
    store: &S,
    uuid: &str,
) -> Result<Vec<RawOrganisationRow>, StoreError> {
    let collected: Vec<Vec<RawOrganisationRow>> = store
        .fetch(ORGANISATION_BY_UUID, &[("uuid", uuid)], "rs")
        .await?;
    Ok(collected.into_iter().flatten().collect())
}
