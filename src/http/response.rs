//! JSON error bodies and status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::withdraw::WithdrawError;

/// Error payload returned by every API route.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
            hint: None,
        }),
    )
        .into_response()
}

impl WithdrawError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WithdrawError::UnknownToken(_) => StatusCode::NOT_FOUND,
            WithdrawError::NotConnected | WithdrawError::NoProfile => StatusCode::PRECONDITION_FAILED,
            WithdrawError::InProgress(_) => StatusCode::CONFLICT,
            WithdrawError::Chain(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for WithdrawError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WithdrawError::UnknownToken("WETH".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(WithdrawError::NotConnected.status_code(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(WithdrawError::InProgress("DAI".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            WithdrawError::Chain(BlockchainError::Timeout(1)).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_hint_omitted_when_absent() {
        let json = serde_json::to_value(ErrorBody {
            error: "boom".to_string(),
            hint: None,
        })
        .unwrap();
        assert!(json.get("hint").is_none());
    }
}
