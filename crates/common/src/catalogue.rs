//! # Service catalogue
//!
//! The catalogue advertised by the service document is hard coded: three
//! deposit collections (a, b, c) split across two workspaces. Nothing in it
//! depends on server state; only the collection locations move with the
//! address the request came in on.

use serde::{Deserialize, Serialize};

/// SWORD protocol version spoken by the server.
pub const PROTOCOL_VERSION: &str = "1.3";
/// Path the service document is served from. Stripped from the request
/// location to find the deposit root.
pub const SERVICE_DOCUMENT_PATH: &str = "/servicedocument";
/// Packaging format accepted by every collection.
pub const METS_DSPACE_SIP: &str = "http://purl.org/net/sword-types/METSDSpaceSIP";
/// Media type accepted by every collection.
pub const ZIP_MEDIA_TYPE: &str = "application/zip";
/// On-behalf-of value that forces a mediation error, used by conformance
/// suites to exercise the error path.
pub const MEDIATION_ERROR_SENTINEL: &str = "error";

const COLLECTION_POLICY: &str =
    "This collection does not actually exist and will not receive deposits. ";
const COLLECTION_ABSTRACT: &str = "This is test collection.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptPackaging {
    pub format: String,
    pub priority: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub title: String,
    pub location: String,
    pub accepted_media_types: Vec<String>,
    pub accepted_packaging: Vec<AcceptPackaging>,
    pub policy: String,
    pub abstract_text: String,
    pub mediation_allowed: bool,
}

impl Collection {
    fn mock(title: &str, location: String) -> Self {
        Self {
            title: title.to_string(),
            location,
            accepted_media_types: vec![ZIP_MEDIA_TYPE.to_string()],
            accepted_packaging: vec![AcceptPackaging {
                format: METS_DSPACE_SIP.to_string(),
                priority: 1.0,
            }],
            policy: COLLECTION_POLICY.to_string(),
            abstract_text: COLLECTION_ABSTRACT.to_string(),
            mediation_allowed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub title: String,
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalogue {
    pub protocol_version: String,
    pub supports_mediation: bool,
    pub supports_no_op: bool,
    pub supports_verbose: bool,
    pub workspaces: Vec<Workspace>,
}

impl ServiceCatalogue {
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.workspaces.iter().flat_map(|w| w.collections.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error("Mediated deposits not allowed")]
    MediationNotAllowed,
}

/// Resolve the deposit root from the location the service document was
/// requested at. Any query or fragment is dropped.
pub fn catalogue_root(location: &str) -> &str {
    let path = location
        .find(|c: char| c == '?' || c == '#')
        .map_or(location, |end| &location[..end]);
    let trimmed = path.trim_end_matches('/');
    trimmed
        .strip_suffix(SERVICE_DOCUMENT_PATH)
        .unwrap_or(trimmed)
}

/// Build the service catalogue for a request made at `location`.
pub fn build_catalogue(
    location: &str,
    on_behalf_of: Option<&str>,
) -> Result<ServiceCatalogue, CatalogueError> {
    if on_behalf_of == Some(MEDIATION_ERROR_SENTINEL) {
        tracing::info!("on-behalf-of user set to 'error', refusing the service document");
        return Err(CatalogueError::MediationNotAllowed);
    }

    let root = catalogue_root(location);
    let deposit = |suffix: &str| format!("{}/deposit/{}", root, suffix);

    let workspaces = vec![
        Workspace {
            title: "Workspace 1".to_string(),
            collections: vec![
                Collection::mock("Collection A", deposit("a")),
                Collection::mock("Collection B", deposit("b")),
            ],
        },
        Workspace {
            title: "Workspace 2".to_string(),
            collections: vec![Collection::mock("Collection C", deposit("c"))],
        },
    ];

    tracing::info!(
        root = %root,
        "generated mock service document with three collections across two workspaces"
    );

    Ok(ServiceCatalogue {
        protocol_version: PROTOCOL_VERSION.to_string(),
        supports_mediation: true,
        supports_no_op: true,
        supports_verbose: true,
        workspaces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION: &str = "http://localhost:8082/servicedocument";

    #[test]
    fn test_catalogue_layout() {
        let catalogue = build_catalogue(LOCATION, None).unwrap();
        assert_eq!(catalogue.protocol_version, "1.3");
        assert_eq!(catalogue.workspaces.len(), 2);

        let first = &catalogue.workspaces[0];
        assert_eq!(first.title, "Workspace 1");
        assert_eq!(first.collections.len(), 2);
        assert_eq!(first.collections[0].title, "Collection A");
        assert_eq!(
            first.collections[0].location,
            "http://localhost:8082/deposit/a"
        );
        assert_eq!(first.collections[1].title, "Collection B");
        assert_eq!(
            first.collections[1].location,
            "http://localhost:8082/deposit/b"
        );

        let second = &catalogue.workspaces[1];
        assert_eq!(second.title, "Workspace 2");
        assert_eq!(second.collections.len(), 1);
        assert_eq!(second.collections[0].title, "Collection C");
        assert_eq!(
            second.collections[0].location,
            "http://localhost:8082/deposit/c"
        );
    }

    #[test]
    fn test_every_collection_accepts_zip_mets() {
        let catalogue = build_catalogue(LOCATION, None).unwrap();
        for collection in catalogue.collections() {
            assert_eq!(collection.accepted_media_types, vec!["application/zip"]);
            assert_eq!(collection.accepted_packaging.len(), 1);
            assert_eq!(collection.accepted_packaging[0].format, METS_DSPACE_SIP);
            assert_eq!(collection.accepted_packaging[0].priority, 1.0);
            // Advertised for every collection, even though deposits enforce
            // a narrower location-based rule.
            assert!(collection.mediation_allowed);
        }
    }

    #[test]
    fn test_error_sentinel_refuses() {
        assert_eq!(
            build_catalogue(LOCATION, Some("error")),
            Err(CatalogueError::MediationNotAllowed)
        );
    }

    #[test]
    fn test_other_on_behalf_of_is_fine() {
        assert!(build_catalogue(LOCATION, Some("bob")).is_ok());
        assert!(build_catalogue(LOCATION, Some("Error")).is_ok());
    }

    #[test]
    fn test_catalogue_is_deterministic() {
        let a = build_catalogue(LOCATION, None).unwrap();
        let b = build_catalogue(LOCATION, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn test_catalogue_root() {
        assert_eq!(catalogue_root(LOCATION), "http://localhost:8082");
        assert_eq!(
            catalogue_root("http://localhost:8082/servicedocument/"),
            "http://localhost:8082"
        );
        assert_eq!(
            catalogue_root("http://example.org/sword/servicedocument"),
            "http://example.org/sword"
        );
        assert_eq!(catalogue_root("http://example.org/"), "http://example.org");
    }

    #[test]
    fn test_catalogue_root_ignores_query() {
        assert_eq!(
            catalogue_root("http://host/servicedocument?client=x"),
            "http://host"
        );
        assert_eq!(
            catalogue_root("http://host/servicedocument/?a=b#top"),
            "http://host"
        );
        assert_eq!(catalogue_root("http://host/sword#frag"), "http://host/sword");

        let catalogue = build_catalogue("http://host/servicedocument?client=x", None).unwrap();
        let locations: Vec<_> = catalogue
            .collections()
            .map(|c| c.location.as_str())
            .collect();
        assert_eq!(
            locations,
            vec![
                "http://host/deposit/a",
                "http://host/deposit/b",
                "http://host/deposit/c"
            ]
        );
    }
}
