//! # METS manifests
//!
//! Deposit packages carry a `mets.xml` manifest. Descriptive metadata lives
//! in DSpace intermediate format (DIM) fields wrapped inside the METS
//! descriptive metadata section:
//!
//! ```text
//! mets:mets / mets:dmdSec / mets:mdWrap / mets:xmlData / dim:dim / dim:field
//! ```
//!
//! Each `dim:field` names its value with `mdschema`, `element` and an
//! optional `qualifier` attribute, e.g. `dc.title` or `dc.date.issued`.
//! Lookups walk that fixed path and return the first matching field in
//! document order.

use std::fmt;

use roxmltree::{Document, Node};

pub const METS_NAMESPACE: &str = "http://www.loc.gov/METS/";
pub const DIM_NAMESPACE: &str = "http://www.dspace.org/xmlns/dspace/dim";

/// Name of the manifest entry inside a deposit package.
pub const MANIFEST_ENTRY_NAME: &str = "mets.xml";

/// Element steps below the `mets:mets` root leading to metadata fields.
const FIELD_PATH: [(&str, &str); 5] = [
    (METS_NAMESPACE, "dmdSec"),
    (METS_NAMESPACE, "mdWrap"),
    (METS_NAMESPACE, "xmlData"),
    (DIM_NAMESPACE, "dim"),
    (DIM_NAMESPACE, "field"),
];

/// Identifies a metadata field by schema, element and optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldQuery {
    pub schema: String,
    pub element: String,
    pub qualifier: Option<String>,
}

impl FieldQuery {
    pub fn new(schema: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            element: element.into(),
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Dotted key, e.g. `dc.title` or `dc.date.issued`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    fn matches(&self, node: &Node) -> bool {
        node.attribute("mdschema") == Some(self.schema.as_str())
            && node.attribute("element") == Some(self.element.as_str())
            && match &self.qualifier {
                Some(qualifier) => node.attribute("qualifier") == Some(qualifier.as_str()),
                None => true,
            }
    }
}

impl fmt::Display for FieldQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}.{}", self.schema, self.element, q),
            None => write!(f, "{}.{}", self.schema, self.element),
        }
    }
}

/// Fields every deposit manifest must carry.
pub fn required_fields() -> Vec<FieldQuery> {
    vec![FieldQuery::new("dc", "title")]
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("manifest is not well-formed XML: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// A parsed manifest, borrowing the raw text it was parsed from.
pub struct ManifestDocument<'input> {
    doc: Document<'input>,
}

impl<'input> ManifestDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, ManifestError> {
        let doc = Document::parse(text)?;
        Ok(Self { doc })
    }

    pub fn from_bytes(bytes: &'input [u8]) -> Result<Self, ManifestError> {
        Self::parse(std::str::from_utf8(bytes)?)
    }

    /// Text of the first field matching `query`, if any.
    pub fn field(&self, query: &FieldQuery) -> Option<&str> {
        self.field_node(query).map(|node| node.text().unwrap_or(""))
    }

    /// Look up every query, in order.
    pub fn extract(&self, queries: &[FieldQuery]) -> RequiredFieldSet {
        RequiredFieldSet {
            fields: queries
                .iter()
                .map(|q| (q.key(), self.field(q).map(str::to_string)))
                .collect(),
        }
    }

    fn field_node(&self, query: &FieldQuery) -> Option<Node<'_, 'input>> {
        let root = self.doc.root_element();
        if !is_element(&root, METS_NAMESPACE, "mets") {
            return None;
        }

        let mut nodes = vec![root];
        for (namespace, name) in FIELD_PATH {
            nodes = nodes
                .iter()
                .flat_map(|n| n.children())
                .filter(|c| is_element(c, namespace, name))
                .collect();
        }

        nodes.into_iter().find(|n| query.matches(n))
    }
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

/// Extracted values for the required fields of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFieldSet {
    fields: Vec<(String, Option<String>)>,
}

impl RequiredFieldSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Keys whose value is absent or blank.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
            .map(|(k, _)| k.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::mets_manifest;

    #[test]
    fn test_finds_title() {
        let xml = mets_manifest(&[("dc", "title", None, "A Thesis")]);
        let doc = ManifestDocument::parse(&xml).unwrap();
        assert_eq!(doc.field(&FieldQuery::new("dc", "title")), Some("A Thesis"));
    }

    #[test]
    fn test_qualifier_is_unconstrained_unless_given() {
        let xml = mets_manifest(&[
            ("dc", "date", Some("issued"), "2009"),
            ("dc", "date", Some("accessioned"), "2010"),
        ]);
        let doc = ManifestDocument::parse(&xml).unwrap();
        assert_eq!(doc.field(&FieldQuery::new("dc", "date")), Some("2009"));
        assert_eq!(
            doc.field(&FieldQuery::new("dc", "date").with_qualifier("accessioned")),
            Some("2010")
        );
        assert_eq!(
            doc.field(&FieldQuery::new("dc", "date").with_qualifier("created")),
            None
        );
    }

    #[test]
    fn test_schema_must_match() {
        let xml = mets_manifest(&[("local", "title", None, "Wrong schema")]);
        let doc = ManifestDocument::parse(&xml).unwrap();
        assert_eq!(doc.field(&FieldQuery::new("dc", "title")), None);
    }

    #[test]
    fn test_fields_outside_the_path_are_ignored() {
        let xml = r#"<?xml version="1.0"?>
<mets xmlns="http://www.loc.gov/METS/" xmlns:dim="http://www.dspace.org/xmlns/dspace/dim">
  <dim:dim><dim:field mdschema="dc" element="title">Stray</dim:field></dim:dim>
</mets>"#;
        let doc = ManifestDocument::parse(xml).unwrap();
        assert_eq!(doc.field(&FieldQuery::new("dc", "title")), None);
    }

    #[test]
    fn test_namespaces_must_match() {
        let xml = r#"<mets><dmdSec><mdWrap><xmlData><dim><field mdschema="dc" element="title">No ns</field></dim></xmlData></mdWrap></dmdSec></mets>"#;
        let doc = ManifestDocument::parse(xml).unwrap();
        assert_eq!(doc.field(&FieldQuery::new("dc", "title")), None);
    }

    #[test]
    fn test_empty_field_is_missing() {
        let xml = mets_manifest(&[("dc", "title", None, "  ")]);
        let doc = ManifestDocument::parse(&xml).unwrap();
        let fields = doc.extract(&required_fields());
        assert_eq!(fields.get("dc.title"), Some("  "));
        assert_eq!(fields.missing().collect::<Vec<_>>(), vec!["dc.title"]);
        assert!(!fields.is_complete());
    }

    #[test]
    fn test_extract_complete() {
        let xml = mets_manifest(&[("dc", "title", None, "Present")]);
        let doc = ManifestDocument::parse(&xml).unwrap();
        assert!(doc.extract(&required_fields()).is_complete());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ManifestDocument::parse("<mets>"),
            Err(ManifestError::Parse(_))
        ));
        assert!(matches!(
            ManifestDocument::from_bytes(&[0x3c, 0xff, 0xfe]),
            Err(ManifestError::Encoding(_))
        ));
    }

    #[test]
    fn test_field_key() {
        assert_eq!(FieldQuery::new("dc", "title").key(), "dc.title");
        assert_eq!(
            FieldQuery::new("dc", "date").with_qualifier("issued").key(),
            "dc.date.issued"
        );
    }
}
