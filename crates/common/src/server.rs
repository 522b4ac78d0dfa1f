//! # Protocol handler
//!
//! [`SwordServer`] is the surface a transport drives: one method per request
//! kind. [`MockServer`] is the only implementation: it authenticates, checks
//! mediation, validates the package and issues a receipt, but never keeps
//! what was deposited.
//!
//! All methods are blocking. The only state shared between requests is the
//! [`DepositCounter`].

use std::fmt;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::catalogue::{build_catalogue, ServiceCatalogue};
use crate::counter::DepositCounter;
use crate::error::ProtocolError;
use crate::receipt::{build_acknowledgment, Clock, DepositAcknowledgment, SystemClock};
use crate::validator::{validate, PackageSource, ValidationError};

/// Location fragment identifying collections that take on-behalf-of
/// deposits.
pub const MEDIATED_DEPOSIT_MARKER: &str = "deposit?user=";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDocumentRequest {
    pub credentials: Credentials,
    pub on_behalf_of: Option<String>,
    /// Full URL the service document was requested at.
    pub location: String,
}

impl ServiceDocumentRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_on_behalf_of(mut self, on_behalf_of: Option<String>) -> Self {
        self.on_behalf_of = on_behalf_of;
        self
    }
}

/// A deposit as decoded by the transport.
pub struct DepositRequest {
    pub credentials: Credentials,
    pub on_behalf_of: Option<String>,
    /// Full URL (including query) the deposit was posted to.
    pub location: String,
    pub archive: Box<dyn PackageSource>,
    pub filename: Option<String>,
    pub slug: Option<String>,
    pub content_type: Option<String>,
    pub packaging: Option<String>,
    pub no_op: bool,
    pub verbose: bool,
}

impl DepositRequest {
    pub fn new(location: impl Into<String>, archive: impl PackageSource + 'static) -> Self {
        Self {
            credentials: Credentials::default(),
            on_behalf_of: None,
            location: location.into(),
            archive: Box::new(archive),
            filename: None,
            slug: None,
            content_type: None,
            packaging: None,
            no_op: false,
            verbose: false,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_on_behalf_of(mut self, on_behalf_of: Option<String>) -> Self {
        self.on_behalf_of = on_behalf_of;
        self
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    /// An empty slug is treated as no slug.
    pub fn with_slug(mut self, slug: Option<String>) -> Self {
        self.slug = slug.filter(|s| !s.is_empty());
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_packaging(mut self, packaging: Option<String>) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_no_op(mut self, no_op: bool) -> Self {
        self.no_op = no_op;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether this deposit is made on behalf of another user.
    pub fn is_mediated(&self) -> bool {
        self.on_behalf_of.as_deref().is_some_and(|obo| !obo.is_empty())
    }
}

impl fmt::Debug for DepositRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepositRequest")
            .field("username", &self.credentials.username)
            .field("on_behalf_of", &self.on_behalf_of)
            .field("location", &self.location)
            .field("filename", &self.filename)
            .field("slug", &self.slug)
            .field("content_type", &self.content_type)
            .field("packaging", &self.packaging)
            .field("no_op", &self.no_op)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Successful content negotiation. Carries no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentAccepted;

pub trait SwordServer: Send + Sync {
    fn handle_service_document(
        &self,
        request: &ServiceDocumentRequest,
    ) -> Result<ServiceCatalogue, ProtocolError>;

    fn handle_deposit(&self, request: DepositRequest)
        -> Result<DepositAcknowledgment, ProtocolError>;

    fn handle_document_negotiation(
        &self,
        credentials: &Credentials,
    ) -> Result<DocumentAccepted, ProtocolError>;
}

/// A server that answers like a repository but drops every deposit.
#[derive(Clone)]
pub struct MockServer {
    counter: Arc<DepositCounter>,
    clock: Arc<dyn Clock>,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new(Arc::new(DepositCounter::new()), Arc::new(SystemClock))
    }
}

impl fmt::Debug for MockServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockServer")
            .field("counter", &self.counter)
            .finish()
    }
}

impl MockServer {
    pub fn new(counter: Arc<DepositCounter>, clock: Arc<dyn Clock>) -> Self {
        Self { counter, clock }
    }

    pub fn counter(&self) -> &Arc<DepositCounter> {
        &self.counter
    }

    fn check_mediation(request: &DepositRequest) -> Result<(), ProtocolError> {
        if request.is_mediated() && !request.location.contains(MEDIATED_DEPOSIT_MARKER) {
            tracing::info!(
                on_behalf_of = ?request.on_behalf_of,
                location = %request.location,
                "refusing mediated deposit to a collection that does not take them"
            );
            return Err(ProtocolError::mediation_not_allowed(
                "Mediated deposit not allowed to this collection",
            ));
        }
        Ok(())
    }
}

fn content_error(err: ValidationError) -> ProtocolError {
    match &err {
        ValidationError::Archive(e) => {
            tracing::error!(error = %e, "failed to open deposited zip file");
            ProtocolError::content("Failed to open deposited zip file")
        }
        ValidationError::Io(e) => {
            tracing::error!(error = %e, "failed to read deposited zip file");
            ProtocolError::content("Failed to open deposited zip file")
        }
        ValidationError::Manifest(e) => {
            tracing::error!(error = %e, "failed to parse the mets manifest");
            ProtocolError::content("Encountered an error while processing the metadata")
        }
        ValidationError::ManifestTooLarge { limit } => {
            tracing::error!(limit, "mets manifest exceeds the size limit");
            ProtocolError::content("Encountered an error while processing the metadata")
        }
        ValidationError::Unexpected(e) => {
            tracing::error!(error = %e, "unexpected failure while processing the metadata");
            ProtocolError::content("Encountered an unexpected error while processing the metadata")
        }
    }
}

impl SwordServer for MockServer {
    fn handle_service_document(
        &self,
        request: &ServiceDocumentRequest,
    ) -> Result<ServiceCatalogue, ProtocolError> {
        request.credentials.authenticate()?;
        Ok(build_catalogue(
            &request.location,
            request.on_behalf_of.as_deref(),
        )?)
    }

    fn handle_deposit(
        &self,
        mut request: DepositRequest,
    ) -> Result<DepositAcknowledgment, ProtocolError> {
        request.credentials.authenticate()?;
        Self::check_mediation(&request)?;

        tracing::debug!(?request, "validating deposit");
        let outcome = validate(&mut request.archive).map_err(content_error)?;

        if !outcome.manifest_found {
            tracing::error!("the deposit package did not contain a mets manifest");
            return Err(ProtocolError::content(
                "Mets manifest document was not found, unable to process item deposit.",
            ));
        }
        if !outcome.required_fields_present {
            return Err(ProtocolError::content("Missing or empty required fields"));
        }

        let ack = build_acknowledgment(&request, &outcome, &self.counter, self.clock.as_ref());
        tracing::info!(
            id = %ack.id,
            no_op = ack.no_op,
            entries = outcome.entry_names.len(),
            "accepted deposit"
        );
        Ok(ack)
    }

    fn handle_document_negotiation(
        &self,
        credentials: &Credentials,
    ) -> Result<DocumentAccepted, ProtocolError> {
        credentials.authenticate()?;
        Ok(DocumentAccepted)
    }
}
