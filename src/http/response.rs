//! Response bodies and status mapping.
//!
//! | result                         | status |
//! |--------------------------------|--------|
//! | `Confirmed`                    | 200    |
//! | invalid input                  | 400    |
//! | `Invalidated`                  | 409    |
//! | `Rejected`                     | 422    |
//! | pinning failure                | 502    |
//! | submission / chain failure     | 503    |
//! | no outcome before the deadline | 504    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::OrderOutcome;
use crate::orders::{OrderError, PlacedOrder};

/// Body of a successful order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub request_id: String,
    pub cid: String,
    pub status: String,
    pub size_bytes: u64,
    pub tx_hash: String,
    pub nonce: u64,
}

/// Body of every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub request_id: String,
    pub status: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tx_hash: Option<String>,
}

impl ErrorResponse {
    pub fn new(request_id: &str, status: &str, error: impl Into<String>) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: status.to_string(),
            error: error.into(),
            tx_hash: None,
        }
    }

    pub fn into_response_with(self, code: StatusCode) -> Response {
        (code, Json(self)).into_response()
    }
}

/// Map a finished order to an HTTP response.
pub fn from_placed(request_id: &str, placed: PlacedOrder) -> Response {
    let tx_hash = placed.tx_hash.to_string();
    match placed.outcome {
        OrderOutcome::Confirmed { cid } => (
            StatusCode::OK,
            Json(OrderResponse {
                request_id: request_id.to_string(),
                cid,
                status: "confirmed".to_string(),
                size_bytes: placed.size_bytes,
                tx_hash,
                nonce: placed.nonce,
            }),
        )
            .into_response(),
        OrderOutcome::Rejected { reason } => ErrorResponse {
            tx_hash: Some(tx_hash),
            ..ErrorResponse::new(request_id, "rejected", reason)
        }
        .into_response_with(StatusCode::UNPROCESSABLE_ENTITY),
        OrderOutcome::Invalidated { reason } => ErrorResponse {
            tx_hash: Some(tx_hash),
            ..ErrorResponse::new(request_id, "invalidated", reason)
        }
        .into_response_with(StatusCode::CONFLICT),
    }
}

/// Status code for an order error.
pub fn status_for(error: &OrderError) -> StatusCode {
    match error {
        OrderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        OrderError::Pinning(_) => StatusCode::BAD_GATEWAY,
        OrderError::ObservationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        OrderError::Chain(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Map an order error to an HTTP response.
pub fn from_error(request_id: &str, error: &OrderError) -> Response {
    ErrorResponse::new(request_id, error.kind(), error.to_string()).into_response_with(status_for(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::ChainError;
    use crate::pinning::PinningError;
    use alloy::primitives::B256;

    fn placed(outcome: OrderOutcome) -> PlacedOrder {
        PlacedOrder {
            cid: "QmTest1".to_string(),
            size_bytes: 1024,
            outcome,
            tx_hash: B256::repeat_byte(0xab),
            nonce: 3,
        }
    }

    #[test]
    fn test_outcome_status_codes() {
        let ok = from_placed("r1", placed(OrderOutcome::Confirmed { cid: "QmTest1".into() }));
        assert_eq!(ok.status(), StatusCode::OK);

        let rejected = from_placed("r2", placed(OrderOutcome::Rejected { reason: "execution failed".into() }));
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalidated = from_placed("r3", placed(OrderOutcome::Invalidated { reason: "Dropped".into() }));
        assert_eq!(invalidated.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            status_for(&OrderError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PinningError::Http("x".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ChainError::Submission("x".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&OrderError::ObservationTimeout(1)),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_error_body_omits_missing_hash() {
        let body = serde_json::to_value(ErrorResponse::new("r9", "timeout", "late")).unwrap();
        assert_eq!(body["requestId"], "r9");
        assert!(body.get("txHash").is_none());
    }
}
