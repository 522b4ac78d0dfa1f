use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;

use common::prelude::{ServiceDocumentRequest, SwordServer};

use crate::ServiceState;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const READINESS_LOCATION: &str = "http://localhost/servicedocument";

#[derive(Debug, thiserror::Error)]
enum ReadinessError {
    #[error("the server could not build its service document")]
    DependencyFailure,
    #[error("service is shutting down")]
    ShuttingDown,
}

/// The server is ready once it can answer an anonymous service document
/// request.
async fn check_ready(server: Arc<dyn SwordServer>) -> Result<(), ReadinessError> {
    let request = ServiceDocumentRequest::new(READINESS_LOCATION);
    tokio::task::spawn_blocking(move || server.handle_service_document(&request))
        .await
        .map_err(|_| ReadinessError::ShuttingDown)?
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(error = %e, "readiness check failed");
            ReadinessError::DependencyFailure
        })
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    match timeout(HEALTH_CHECK_TIMEOUT, check_ready(state.server().clone())).await {
        Ok(Ok(())) => {
            let msg = serde_json::json!({"status": "ok"});
            (StatusCode::OK, Json(msg)).into_response()
        }
        Ok(Err(e)) => {
            let msg = serde_json::json!({"status": "failure", "message": e.to_string()});
            (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
        }
        Err(_) => {
            let msg = serde_json::json!({
                "status": "failure",
                "message": "health check timed out"
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use common::prelude::{
        Credentials, DepositAcknowledgment, DepositRequest, DocumentAccepted, ProtocolError,
        ServiceCatalogue,
    };

    use super::*;

    struct Broken;

    impl SwordServer for Broken {
        fn handle_service_document(
            &self,
            _request: &ServiceDocumentRequest,
        ) -> Result<ServiceCatalogue, ProtocolError> {
            Err(ProtocolError::bad_request("broken"))
        }

        fn handle_deposit(
            &self,
            _request: DepositRequest,
        ) -> Result<DepositAcknowledgment, ProtocolError> {
            Err(ProtocolError::bad_request("broken"))
        }

        fn handle_document_negotiation(
            &self,
            _credentials: &Credentials,
        ) -> Result<DocumentAccepted, ProtocolError> {
            Err(ProtocolError::bad_request("broken"))
        }
    }

    #[tokio::test]
    async fn test_handler_direct() {
        let response = handler(State(ServiceState::mock())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = handler(State(ServiceState::new(Arc::new(Broken)))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
