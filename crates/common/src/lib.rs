/**
 * The toy credential gate applied to every
 *  inbound request.
 */
pub mod auth;
/**
 * The service document: workspaces and the
 *  collections that accept deposits.
 */
pub mod catalogue;
/**
 * Process-wide deposit numbering.
 */
pub mod counter;
/**
 * Protocol-level error codes shared by the
 *  handler and the transport.
 */
pub mod error;
/**
 * METS manifest parsing and metadata
 *  field lookup.
 */
pub mod manifest;
/**
 * Acknowledgment entries returned for
 *  accepted deposits.
 */
pub mod receipt;
/**
 * The protocol handler that sequences
 *  authentication, validation and receipts.
 */
pub mod server;
/**
 * In-memory deposit packages for tests. Built for this crate's own tests
 *  and, behind the `testkit` feature, for dependents' tests.
 */
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
/**
 * Streaming validation of deposited
 *  zip packages.
 */
pub mod validator;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::auth::{authenticate, AuthError, Credentials};
    pub use crate::catalogue::{build_catalogue, Collection, ServiceCatalogue, Workspace};
    pub use crate::counter::DepositCounter;
    pub use crate::error::{ErrorCode, ProtocolError};
    pub use crate::manifest::{FieldQuery, ManifestDocument, ManifestError};
    pub use crate::receipt::{Clock, DepositAcknowledgment, SystemClock};
    pub use crate::server::{
        DepositRequest, DocumentAccepted, MockServer, ServiceDocumentRequest, SwordServer,
    };
    pub use crate::validator::{validate, PackageSource, ValidationError, ValidationOutcome};
    pub use crate::version::build_info;
}
