//! # Deposit validation
//!
//! Deposits are zip packages. The archive is first decoded as a stream of
//! local entries, one at a time, so a package never has to be held in memory
//! as a whole. Only the manifest entry is buffered, and never beyond
//! [`MAX_MANIFEST_BYTES`].
//!
//! Entries written by streaming zip writers carry their sizes in a trailing
//! data descriptor rather than the local header, which the stream decoder
//! cannot follow. For those packages the source is rewound and read through
//! its central directory instead.
//!
//! A package is acceptable when it contains a `mets.xml` entry whose required
//! fields are all present and non-blank. Failing to read the archive or the
//! manifest is an error; a readable package that is missing its manifest or
//! its metadata is reported through the [`ValidationOutcome`].

use std::any::Any;
use std::io::{Read, Seek};
use std::panic::{self, AssertUnwindSafe};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::manifest::{
    required_fields, FieldQuery, ManifestDocument, ManifestError, RequiredFieldSet,
    MANIFEST_ENTRY_NAME,
};

/// Upper bound on the manifest bytes read from a package. Sizes declared in
/// the archive are not trusted.
pub const MAX_MANIFEST_BYTES: u64 = 16 * 1024 * 1024;

/// A deposited package: readable, and rewindable for the central directory
/// fallback.
pub trait PackageSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> PackageSource for T {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether a `mets.xml` entry was seen.
    pub manifest_found: bool,
    /// Whether every manifest seen carried all required fields.
    pub required_fields_present: bool,
    /// Every entry name in archive order.
    pub entry_names: Vec<String>,
    /// Values extracted from the last manifest seen.
    pub required_fields: RequiredFieldSet,
}

impl ValidationOutcome {
    pub fn is_acceptable(&self) -> bool {
        self.manifest_found && self.required_fields_present
    }

    fn started() -> Self {
        Self {
            required_fields_present: true,
            ..Default::default()
        }
    }

    fn finished(mut self) -> Self {
        if !self.manifest_found {
            self.required_fields_present = false;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("failed to open deposited zip file: {0}")]
    Archive(#[from] ZipError),
    #[error("failed to read deposited zip file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to process the metadata: {0}")]
    Manifest(#[from] ManifestError),
    #[error("manifest exceeds {limit} bytes")]
    ManifestTooLarge { limit: u64 },
    #[error("unexpected failure while processing the metadata: {0}")]
    Unexpected(String),
}

/// Walk a deposited package and check its manifest.
///
/// Panics raised while walking the package are caught and reported as
/// [`ValidationError::Unexpected`].
pub fn validate<R: Read + Seek>(mut reader: R) -> Result<ValidationOutcome, ValidationError> {
    panic::catch_unwind(AssertUnwindSafe(|| match walk_stream(&mut reader) {
        Err(ValidationError::Archive(ZipError::UnsupportedArchive(reason))) => {
            tracing::debug!(reason, "reading package through its central directory");
            reader.rewind()?;
            walk_archive(&mut reader)
        }
        walked => walked,
    }))
    .unwrap_or_else(|payload| Err(ValidationError::Unexpected(panic_message(payload))))
}

fn walk_stream<R: Read>(mut reader: R) -> Result<ValidationOutcome, ValidationError> {
    let queries = required_fields();
    let mut outcome = ValidationOutcome::started();

    while let Some(mut entry) = zip::read::read_zipfile_from_stream(&mut reader)? {
        let name = entry.name().to_string();
        record_entry(&mut outcome, &queries, name, &mut entry)?;
    }

    Ok(outcome.finished())
}

fn walk_archive<R: Read + Seek>(reader: R) -> Result<ValidationOutcome, ValidationError> {
    let queries = required_fields();
    let mut outcome = ValidationOutcome::started();

    let mut archive = ZipArchive::new(reader)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        record_entry(&mut outcome, &queries, name, &mut entry)?;
    }

    Ok(outcome.finished())
}

fn record_entry<R: Read>(
    outcome: &mut ValidationOutcome,
    queries: &[FieldQuery],
    name: String,
    entry: &mut R,
) -> Result<(), ValidationError> {
    tracing::debug!(entry = %name, "read package entry");

    if name == MANIFEST_ENTRY_NAME {
        outcome.manifest_found = true;

        let raw = read_manifest(entry)?;
        let manifest = ManifestDocument::from_bytes(&raw)?;
        let fields = manifest.extract(queries);
        for key in fields.missing() {
            tracing::info!(field = %key, "required field is missing or empty");
        }
        outcome.required_fields_present &= fields.is_complete();
        outcome.required_fields = fields;
    }

    outcome.entry_names.push(name);
    Ok(())
}

fn read_manifest<R: Read>(entry: &mut R) -> Result<Vec<u8>, ValidationError> {
    let mut raw = Vec::new();
    entry.take(MAX_MANIFEST_BYTES + 1).read_to_end(&mut raw)?;
    if raw.len() as u64 > MAX_MANIFEST_BYTES {
        return Err(ValidationError::ManifestTooLarge {
            limit: MAX_MANIFEST_BYTES,
        });
    }
    Ok(raw)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
