use alloy::primitives::Address;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::withdraw::WithdrawError;

#[derive(Debug, Deserialize)]
pub struct SetProfileRequest {
    /// New profile contract address; `null` signs the session out of it.
    pub profile_addr: Option<String>,
}

pub async fn get_withdraw(State(state): State<AppState>) -> Response {
    Json(state.withdraw.view()).into_response()
}

pub async fn refresh_balances(State(state): State<AppState>) -> Response {
    match state.withdraw.fetch_balances().await {
        Ok(()) => Json(state.withdraw.view()).into_response(),
        Err(WithdrawError::Chain(_)) => {
            (StatusCode::BAD_GATEWAY, Json(state.withdraw.view())).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Start a withdraw in the background; poll `GET /api/withdraw` for the result.
pub async fn start_withdraw(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Response {
    let pending = match state.withdraw.start(&symbol) {
        Ok(pending) => pending,
        Err(e) => return e.into_response(),
    };

    let page = state.withdraw.clone();
    tokio::spawn(async move {
        let symbol = pending.symbol().to_string();
        let outcome = page.finish(pending).await;
        tracing::debug!(token = %symbol, outcome = ?outcome, "Background withdraw finished");
    });

    (StatusCode::ACCEPTED, Json(state.withdraw.view())).into_response()
}

pub async fn set_session_profile(
    State(state): State<AppState>,
    Json(request): Json<SetProfileRequest>,
) -> Response {
    let profile_addr = match request.profile_addr.as_deref().map(str::parse::<Address>) {
        None => None,
        Some(Ok(addr)) => Some(addr),
        Some(Err(_)) => {
            return error_response(StatusCode::BAD_REQUEST, "profile_addr is not a valid address")
        }
    };

    state.withdraw.set_profile_addr(profile_addr);
    if profile_addr.is_some() {
        // Failures surface in the view's error message.
        let _ = state.withdraw.fetch_balances().await;
    }

    Json(state.withdraw.view()).into_response()
}
