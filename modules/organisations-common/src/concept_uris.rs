//! Canonical identifiers, API URLs and ontology type URIs for graph concepts.
//!
//! Graph nodes carry a bare `uuid` and a set of labels (`Organisation`,
//! `Company`, `Person`, ...). Clients never see either directly: they get a
//! thing URL as the id, an API URL pointing at the most specific resource
//! collection, and the ontology URIs of every known label, ancestors first.

/// Canonical identity of one concept node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptIdentity {
    pub id: String,
    pub api_url: String,
    pub types: Vec<String>,
}

/// Maps raw node identifiers and labels to their public form.
pub trait IdentityMapper: Send + Sync {
    fn id_url(&self, uuid: &str) -> String;

    fn api_url(&self, uuid: &str, labels: &[String]) -> String;

    fn type_uris(&self, labels: &[String]) -> Vec<String>;

    fn identify(&self, uuid: &str, labels: &[String]) -> ConceptIdentity {
        ConceptIdentity {
            id: self.id_url(uuid),
            api_url: self.api_url(uuid, labels),
            types: self.type_uris(labels),
        }
    }
}

struct ConceptType {
    label: &'static str,
    parent: Option<&'static str>,
    uri: &'static str,
    /// Resource collection under the API base, when the type has its own.
    collection: Option<&'static str>,
}

const CONCEPT_TYPES: &[ConceptType] = &[
    ConceptType {
        label: "Thing",
        parent: None,
        uri: "http://www.ft.com/ontology/core/Thing",
        collection: Some("things"),
    },
    ConceptType {
        label: "Concept",
        parent: Some("Thing"),
        uri: "http://www.ft.com/ontology/concept/Concept",
        collection: None,
    },
    ConceptType {
        label: "Role",
        parent: Some("Thing"),
        uri: "http://www.ft.com/ontology/organisation/Role",
        collection: None,
    },
    ConceptType {
        label: "BoardRole",
        parent: Some("Role"),
        uri: "http://www.ft.com/ontology/organisation/BoardRole",
        collection: None,
    },
    ConceptType {
        label: "Content",
        parent: Some("Thing"),
        uri: "http://www.ft.com/ontology/content/Content",
        collection: Some("content"),
    },
    ConceptType {
        label: "Classification",
        parent: Some("Concept"),
        uri: "http://www.ft.com/ontology/classification/Classification",
        collection: None,
    },
    ConceptType {
        label: "Brand",
        parent: Some("Classification"),
        uri: "http://www.ft.com/ontology/product/Brand",
        collection: Some("brands"),
    },
    ConceptType {
        label: "Person",
        parent: Some("Concept"),
        uri: "http://www.ft.com/ontology/person/Person",
        collection: Some("people"),
    },
    ConceptType {
        label: "Membership",
        parent: Some("Concept"),
        uri: "http://www.ft.com/ontology/organisation/Membership",
        collection: None,
    },
    ConceptType {
        label: "Organisation",
        parent: Some("Concept"),
        uri: "http://www.ft.com/ontology/organisation/Organisation",
        collection: Some("organisations"),
    },
    ConceptType {
        label: "Company",
        parent: Some("Organisation"),
        uri: "http://www.ft.com/ontology/company/Company",
        collection: None,
    },
    ConceptType {
        label: "PublicCompany",
        parent: Some("Company"),
        uri: "http://www.ft.com/ontology/company/PublicCompany",
        collection: None,
    },
    ConceptType {
        label: "PrivateCompany",
        parent: Some("Company"),
        uri: "http://www.ft.com/ontology/company/PrivateCompany",
        collection: None,
    },
];

fn concept_type(label: &str) -> Option<&'static ConceptType> {
    CONCEPT_TYPES.iter().find(|t| t.label == label)
}

/// Number of ancestors above `label`; `Thing` is 0.
fn depth(label: &str) -> usize {
    let mut depth = 0;
    let mut current = concept_type(label).and_then(|t| t.parent);
    while let Some(parent) = current {
        depth += 1;
        current = concept_type(parent).and_then(|t| t.parent);
    }
    depth
}

/// Known labels ordered from most general to most specific.
fn known_labels(labels: &[String]) -> Vec<&'static ConceptType> {
    let mut known: Vec<&'static ConceptType> =
        labels.iter().filter_map(|l| concept_type(l)).collect();
    known.sort_by(|a, b| depth(a.label).cmp(&depth(b.label)).then(a.label.cmp(b.label)));
    known.dedup_by(|a, b| a.label == b.label);
    known
}

/// The production identity mapper, rooted at a configurable API base URL.
#[derive(Debug, Clone)]
pub struct ConceptUris {
    api_base: String,
}

impl ConceptUris {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ConceptUris {
    fn default() -> Self {
        Self::new("http://api.ft.com")
    }
}

impl IdentityMapper for ConceptUris {
    fn id_url(&self, uuid: &str) -> String {
        format!("{}/things/{uuid}", self.api_base)
    }

    fn api_url(&self, uuid: &str, labels: &[String]) -> String {
        let most_specific = known_labels(labels).last().map(|t| t.label);
        let mut current = most_specific;
        let mut collection = "things";
        while let Some(label) = current {
            let Some(t) = concept_type(label) else { break };
            if let Some(c) = t.collection {
                collection = c;
                break;
            }
            current = t.parent;
        }
        format!("{}/{collection}/{uuid}", self.api_base)
    }

    fn type_uris(&self, labels: &[String]) -> Vec<String> {
        known_labels(labels)
            .into_iter()
            .map(|t| t.uri.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn id_url_is_thing_url() {
        let uris = ConceptUris::default();
        assert_eq!(uris.id_url("abc"), "http://api.ft.com/things/abc");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let uris = ConceptUris::new("http://test.api.ft.com/");
        assert_eq!(uris.id_url("abc"), "http://test.api.ft.com/things/abc");
    }

    #[test]
    fn company_resolves_to_organisations_collection() {
        let uris = ConceptUris::default();
        let url = uris.api_url(
            "abc",
            &labels(&["Thing", "Concept", "Organisation", "Company", "PublicCompany"]),
        );
        assert_eq!(url, "http://api.ft.com/organisations/abc");
    }

    #[test]
    fn person_resolves_to_people_collection() {
        let uris = ConceptUris::default();
        let url = uris.api_url("p1", &labels(&["Person", "Concept", "Thing"]));
        assert_eq!(url, "http://api.ft.com/people/p1");
    }

    #[test]
    fn unknown_labels_fall_back_to_things() {
        let uris = ConceptUris::default();
        assert_eq!(uris.api_url("x", &labels(&["Mystery"])), "http://api.ft.com/things/x");
        assert_eq!(uris.api_url("x", &[]), "http://api.ft.com/things/x");
    }

    #[test]
    fn type_uris_are_ordered_ancestors_first() {
        let uris = ConceptUris::default();
        let types = uris.type_uris(&labels(&["Company", "Organisation", "Thing", "Concept"]));
        assert_eq!(
            types,
            vec![
                "http://www.ft.com/ontology/core/Thing",
                "http://www.ft.com/ontology/concept/Concept",
                "http://www.ft.com/ontology/organisation/Organisation",
                "http://www.ft.com/ontology/company/Company",
            ]
        );
    }

    #[test]
    fn type_uris_drop_unknown_and_duplicate_labels() {
        let uris = ConceptUris::default();
        let types = uris.type_uris(&labels(&["Person", "Mystery", "Person"]));
        assert_eq!(types, vec!["http://www.ft.com/ontology/person/Person"]);
    }

    #[test]
    fn identify_combines_all_three() {
        let uris = ConceptUris::default();
        let identity = uris.identify("p1", &labels(&["Person"]));
        assert_eq!(identity.id, "http://api.ft.com/things/p1");
        assert_eq!(identity.api_url, "http://api.ft.com/people/p1");
        assert_eq!(identity.types.len(), 1);
    }
}
