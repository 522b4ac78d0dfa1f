//! SWORD 1.3 endpoints: service document discovery, deposit, and content
//! negotiation on deposited items.

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

mod deposit;
mod document;
pub mod error;
pub mod headers;
mod service_document;
pub mod xml;

pub use error::SwordError;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/servicedocument", get(service_document::handler))
        .route("/servicedocument/", get(service_document::handler))
        .route("/servicedocument/*rest", get(service_document::handler))
        .route("/deposit", get(document::handler).post(deposit::handler))
        .route(
            "/deposit/*collection",
            get(document::handler).post(deposit::handler),
        )
        .with_state(state)
}
