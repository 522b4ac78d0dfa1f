//! # Deposit receipts
//!
//! An accepted deposit is answered with an Atom entry describing the item
//! that would have been created. The mock never stores anything, so most of
//! the entry is canned: the content link and item location are synthesized
//! from the deposit number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::DepositCounter;
use crate::server::DepositRequest;
use crate::validator::ValidationOutcome;

pub const GENERATOR_NAME: &str = "Mock SWORD Server";
pub const GENERATOR_URI: &str = "http://localhost/";
pub const GENERATOR_VERSION: &str = "1.3";
pub const CONTENT_TYPE: &str = "application/zip";
pub const CATEGORY: &str = "Category";
pub const TREATMENT: &str =
    "The mock submission was treated with all the respect and dignity befitting its status.";
pub const VERBOSE_DESCRIPTION: &str = "Verbose is on";
/// Author recorded when the deposit carried no username.
pub const UNKNOWN_AUTHOR: &str = "unknown";
/// Domain used to synthesize contributor addresses.
pub const CONTRIBUTOR_EMAIL_DOMAIN: &str = "swordapp.org";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositStatus {
    Created,
}

impl DepositStatus {
    pub fn http_status(&self) -> u16 {
        match self {
            DepositStatus::Created => 201,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub name: String,
    pub uri: String,
    pub version: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            name: GENERATOR_NAME.to_string(),
            uri: GENERATOR_URI.to_string(),
            version: GENERATOR_VERSION.to_string(),
        }
    }
}

/// Acknowledgment entry for an accepted deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAcknowledgment {
    pub status: DepositStatus,
    /// Number assigned to the deposit (or the current number for dry runs).
    pub deposit_number: u64,
    pub title: String,
    pub category: String,
    pub id: String,
    /// UTC, second precision, e.g. `2009-06-01T12:00:00Z`.
    pub updated: String,
    pub summary: String,
    pub author: Author,
    pub contributor: Option<Contributor>,
    pub generator: Generator,
    pub content_type: String,
    pub content_source: String,
    pub treatment: String,
    pub verbose_description: Option<String>,
    pub no_op: bool,
    /// Where the created item would live.
    pub location: String,
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn content_source(number: u64) -> String {
    format!("{}uploads/upload-{}.zip", GENERATOR_URI, number)
}

pub fn item_location(number: u64) -> String {
    format!("{}{}", GENERATOR_URI, number)
}

/// Human readable summary of what the package contained.
pub fn summarize(request: &DepositRequest, outcome: &ValidationOutcome) -> String {
    let mut summary = String::from("Deposit file contained: ");
    if let Some(filename) = &request.filename {
        summary.push_str(&format!("(filename = {}) ", filename));
    }
    if let Some(slug) = &request.slug {
        summary.push_str(&format!("(slug = {}) ", slug));
    }
    for name in &outcome.entry_names {
        summary.push(' ');
        summary.push_str(name);
    }
    summary
}

/// Build the receipt for a validated deposit, claiming a deposit number
/// unless the request is a dry run.
pub fn build_acknowledgment(
    request: &DepositRequest,
    outcome: &ValidationOutcome,
    counter: &DepositCounter,
    clock: &dyn Clock,
) -> DepositAcknowledgment {
    let number = if request.no_op {
        counter.current()
    } else {
        counter.next()
    };

    let id = match &request.slug {
        Some(slug) => format!("{} - ID: {}", slug, number),
        None => format!("ID: {}", number),
    };

    let author = Author {
        name: request
            .credentials
            .username
            .clone()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    };

    let contributor = request.on_behalf_of.as_ref().map(|obo| Contributor {
        name: obo.clone(),
        email: format!("{}@{}", obo, CONTRIBUTOR_EMAIL_DOMAIN),
    });

    DepositAcknowledgment {
        status: DepositStatus::Created,
        deposit_number: number,
        title: format!("DummyServer Deposit: #{}", number),
        category: CATEGORY.to_string(),
        id,
        updated: format_timestamp(clock.now()),
        summary: summarize(request, outcome),
        author,
        contributor,
        generator: Generator::default(),
        content_type: CONTENT_TYPE.to_string(),
        content_source: content_source(number),
        treatment: TREATMENT.to_string(),
        verbose_description: request.verbose.then(|| VERBOSE_DESCRIPTION.to_string()),
        no_op: request.no_op,
        location: item_location(number),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;

    use super::*;
    use crate::auth::Credentials;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2009, 6, 1, 12, 30, 5).unwrap())
    }

    fn outcome() -> ValidationOutcome {
        ValidationOutcome {
            manifest_found: true,
            required_fields_present: true,
            entry_names: vec!["thesis.pdf".to_string(), "mets.xml".to_string()],
            ..Default::default()
        }
    }

    fn request() -> DepositRequest {
        DepositRequest::new("http://localhost:8082/deposit/a", Cursor::new(Vec::new()))
            .with_credentials(Credentials::new("alice", "alice"))
    }

    #[test]
    fn test_first_deposit() {
        let counter = DepositCounter::new();
        let ack = build_acknowledgment(&request(), &outcome(), &counter, &clock());

        assert_eq!(ack.deposit_number, 1);
        assert_eq!(ack.id, "ID: 1");
        assert_eq!(ack.title, "DummyServer Deposit: #1");
        assert_eq!(ack.updated, "2009-06-01T12:30:05Z");
        assert_eq!(ack.author.name, "alice");
        assert_eq!(ack.contributor, None);
        assert_eq!(ack.content_type, "application/zip");
        assert_eq!(ack.content_source, "http://localhost/uploads/upload-1.zip");
        assert_eq!(ack.location, "http://localhost/1");
        assert_eq!(ack.verbose_description, None);
        assert!(!ack.no_op);
        assert_eq!(ack.status.http_status(), 201);
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_slug_and_filename() {
        let counter = DepositCounter::starting_at(6);
        let req = request()
            .with_slug(Some("my-item".to_string()))
            .with_filename(Some("package.zip".to_string()));
        let ack = build_acknowledgment(&req, &outcome(), &counter, &clock());

        assert_eq!(ack.id, "my-item - ID: 7");
        assert_eq!(
            ack.summary,
            "Deposit file contained: (filename = package.zip) (slug = my-item)  thesis.pdf mets.xml"
        );
    }

    #[test]
    fn test_no_op_does_not_claim() {
        let counter = DepositCounter::starting_at(3);
        let req = request().with_no_op(true);
        let first = build_acknowledgment(&req, &outcome(), &counter, &clock());
        let second = build_acknowledgment(&req, &outcome(), &counter, &clock());

        assert_eq!(first.id, "ID: 3");
        assert_eq!(second.id, "ID: 3");
        assert!(first.no_op);
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_anonymous_author_and_contributor() {
        let counter = DepositCounter::new();
        let req = DepositRequest::new("http://localhost/deposit?user=bob", Cursor::new(Vec::new()))
            .with_on_behalf_of(Some("bob".to_string()))
            .with_verbose(true);
        let ack = build_acknowledgment(&req, &outcome(), &counter, &clock());

        assert_eq!(ack.author.name, "unknown");
        assert_eq!(
            ack.contributor,
            Some(Contributor {
                name: "bob".to_string(),
                email: "bob@swordapp.org".to_string(),
            })
        );
        assert_eq!(ack.verbose_description.as_deref(), Some("Verbose is on"));
    }
}
