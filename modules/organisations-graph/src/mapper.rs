//! Folds one raw traversal row into the public `Organisation` aggregate.

use tracing::debug;

use organisations_common::{
    ChangeEvent, IdentityMapper, Membership, Organisation, OrganisationSummary, Person,
};

use crate::traversal::{RawChangeEvent, RawConcept, RawMembershipEntry, RawOrganisationRow};

pub(crate) fn to_organisation(raw: RawOrganisationRow, uris: &dyn IdentityMapper) -> Organisation {
    let identity = uris.identify(&raw.o.id, &raw.o.types);

    // Parent and subsidiaries are decoded but not attached to the aggregate yet.
    let parent = to_summary(&raw.parent, uris);
    let subsidiaries: Vec<OrganisationSummary> = raw
        .sub
        .iter()
        .filter_map(|s| to_summary(s, uris))
        .collect();
    debug!(
        uuid = %raw.o.id,
        parent = ?parent.as_ref().map(|p| p.id.as_str()),
        subsidiaries = subsidiaries.len(),
        "Related organisations decoded but not attached"
    );

    Organisation {
        id: identity.id,
        api_url: identity.api_url,
        types: identity.types,
        lei_code: Some(raw.o.lei_code).filter(|code| !code.is_empty()),
        pref_label: raw.o.pref_label,
        labels: Some(raw.o.labels).filter(|labels| !labels.is_empty()),
        memberships: to_memberships(raw.m, uris),
        parent_organisation: None,
        subsidiaries: None,
    }
}

/// A single membership entry without a person is what the optional match
/// yields when the organisation has no memberships at all.
fn to_memberships(entries: Vec<RawMembershipEntry>, uris: &dyn IdentityMapper) -> Vec<Membership> {
    if entries.len() == 1 && entries[0].p.id.is_empty() {
        return Vec::new();
    }

    entries
        .into_iter()
        .map(|entry| {
            debug!(
                membership = %entry.m.id,
                person = %entry.p.id,
                annotations = entry.p.ann_count,
                "Mapping membership"
            );
            let person = uris.identify(&entry.p.id, &entry.p.types);
            Membership {
                title: entry.m.pref_label,
                person: Person {
                    id: person.id,
                    api_url: person.api_url,
                    types: person.types,
                    pref_label: entry.p.pref_label,
                },
                change_events: to_change_events(&entry.m.change_events),
            }
        })
        .collect()
}

/// One event per populated field, start before end.
fn to_change_events(pair: &[RawChangeEvent]) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    for raw in pair {
        if !raw.started_at.is_empty() {
            events.push(ChangeEvent::Started(raw.started_at.clone()));
        }
        if !raw.ended_at.is_empty() {
            events.push(ChangeEvent::Ended(raw.ended_at.clone()));
        }
    }
    events
}

/// `None` for the null-filled entry an unmatched optional relation produces.
fn to_summary(raw: &RawConcept, uris: &dyn IdentityMapper) -> Option<OrganisationSummary> {
    if raw.id.is_empty() {
        return None;
    }
    let identity = uris.identify(&raw.id, &raw.types);
    Some(OrganisationSummary {
        id: identity.id,
        api_url: identity.api_url,
        types: identity.types,
        pref_label: raw.pref_label.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use organisations_common::ConceptUris;
    use serde_json::{json, Value};

    fn raw_row(value: Value) -> RawOrganisationRow {
        serde_json::from_value(value).unwrap()
    }

    fn membership(person: &str, started: Value, ended: Value) -> Value {
        json!({
            "m": {"id": format!("m-{person}"), "prefLabel": "Director",
                  "changeEvents": [{"startedAt": started}, {"endedAt": ended}]},
            "p": {"id": person, "types": ["Thing", "Concept", "Person"], "prefLabel": format!("Person {person}"), "annCount": 3}
        })
    }

    fn no_membership() -> Value {
        json!({
            "m": {"id": null, "prefLabel": null, "changeEvents": [{"startedAt": null}, {"endedAt": null}]},
            "p": {"id": null, "types": null, "prefLabel": null, "annCount": 0}
        })
    }

    fn row_with(memberships: Vec<Value>) -> RawOrganisationRow {
        raw_row(json!({
            "o": {
                "id": "11111111-2222-3333-4444-555555555555",
                "types": ["Thing", "Concept", "Organisation", "Company"],
                "leiCode": "LEI-123",
                "prefLabel": "Acme Ltd",
                "labels": ["Acme", "Acme Limited"]
            },
            "m": memberships,
            "parent": {"id": null, "types": null, "prefLabel": null},
            "sub": [{"id": null, "types": null, "prefLabel": null}]
        }))
    }

    fn map(row: RawOrganisationRow) -> Organisation {
        to_organisation(row, &ConceptUris::default())
    }

    #[test]
    fn root_fields_go_through_identity_mapper() {
        let org = map(row_with(vec![no_membership()]));
        assert_eq!(org.id, "http://api.ft.com/things/11111111-2222-3333-4444-555555555555");
        assert_eq!(
            org.api_url,
            "http://api.ft.com/organisations/11111111-2222-3333-4444-555555555555"
        );
        assert_eq!(org.types.len(), 4);
        assert_eq!(org.lei_code.as_deref(), Some("LEI-123"));
        assert_eq!(org.pref_label, "Acme Ltd");
        assert_eq!(
            org.labels,
            Some(vec!["Acme".to_string(), "Acme Limited".to_string()])
        );
    }

    #[test]
    fn empty_aliases_and_lei_code_are_absent() {
        let org = map(raw_row(json!({
            "o": {"id": "o1", "types": ["Organisation"], "leiCode": "", "prefLabel": "Bare", "labels": []},
            "m": [no_membership()]
        })));
        assert!(org.labels.is_none());
        assert!(org.lei_code.is_none());
    }

    #[test]
    fn sentinel_membership_is_absorbed() {
        let org = map(row_with(vec![no_membership()]));
        assert!(org.memberships.is_empty());
    }

    #[test]
    fn memberships_keep_query_order() {
        let org = map(row_with(vec![
            membership("p1", json!("2001-01-01"), json!(null)),
            membership("p2", json!("2003-01-01"), json!("2004-01-01")),
            membership("p3", json!(null), json!(null)),
        ]));
        let people: Vec<&str> = org.memberships.iter().map(|m| m.person.pref_label.as_str()).collect();
        assert_eq!(people, vec!["Person p1", "Person p2", "Person p3"]);
        assert_eq!(org.memberships[0].title, "Director");
        assert_eq!(org.memberships[0].person.id, "http://api.ft.com/things/p1");
        assert_eq!(org.memberships[0].person.api_url, "http://api.ft.com/people/p1");
    }

    #[test]
    fn start_only_yields_single_started_event() {
        let org = map(row_with(vec![membership("p1", json!("2001-01-01"), json!(""))]));
        assert_eq!(
            org.memberships[0].change_events,
            vec![ChangeEvent::Started("2001-01-01".into())]
        );
    }

    #[test]
    fn both_endpoints_yield_two_events_in_order() {
        let org = map(row_with(vec![membership("p1", json!("2001-01-01"), json!("2005-06-30"))]));
        assert_eq!(
            org.memberships[0].change_events,
            vec![
                ChangeEvent::Started("2001-01-01".into()),
                ChangeEvent::Ended("2005-06-30".into()),
            ]
        );
    }

    #[test]
    fn empty_pair_yields_no_events() {
        let org = map(row_with(vec![membership("p1", json!(null), json!(""))]));
        assert_eq!(org.memberships.len(), 1);
        assert!(org.memberships[0].change_events.is_empty());
    }

    #[test]
    fn end_only_yields_single_ended_event() {
        let org = map(row_with(vec![membership("p1", json!(""), json!("2005-06-30"))]));
        assert_eq!(
            org.memberships[0].change_events,
            vec![ChangeEvent::Ended("2005-06-30".into())]
        );
    }

    #[test]
    fn parent_and_subsidiaries_are_not_attached() {
        let org = map(raw_row(json!({
            "o": {"id": "o1", "types": ["Organisation"], "prefLabel": "Child"},
            "m": [no_membership()],
            "parent": {"id": "o0", "types": ["Organisation"], "prefLabel": "Parent"},
            "sub": [
                {"id": "o2", "types": ["Organisation"], "prefLabel": "Grandchild A"},
                {"id": "o3", "types": ["Organisation"], "prefLabel": "Grandchild B"}
            ]
        })));
        assert!(org.parent_organisation.is_none());
        assert!(org.subsidiaries.is_none());
    }

    #[test]
    fn empty_related_concepts_decode_to_none() {
        let uris = ConceptUris::default();
        assert!(to_summary(&RawConcept::default(), &uris).is_none());
        let summary = to_summary(
            &RawConcept {
                id: "o2".into(),
                types: vec!["Organisation".into()],
                pref_label: "Sub".into(),
            },
            &uris,
        )
        .unwrap();
        assert_eq!(summary.api_url, "http://api.ft.com/organisations/o2");
    }

    #[test]
    fn mapping_is_deterministic() {
        let row = row_with(vec![
            membership("p1", json!("2001-01-01"), json!("2002-01-01")),
            membership("p2", json!("2003-01-01"), json!(null)),
        ]);
        let first = serde_json::to_vec(&map(row.clone())).unwrap();
        let second = serde_json::to_vec(&map(row)).unwrap();
        assert_eq!(first, second);
    }
}
