use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::request::request_id;
use crate::http::response::{error_response, ErrorBody};
use crate::http::server::AppState;
use crate::profile::view::{NOT_FOUND_HINT, NOT_FOUND_TITLE};
use crate::profile::{ProfileLookup, ProfileView};

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);

    match state.profiles.lookup(&id).await {
        Ok(ProfileLookup::Found(profile)) => {
            (StatusCode::OK, Json(ProfileView::from(profile))).into_response()
        }
        Ok(ProfileLookup::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: NOT_FOUND_TITLE.to_string(),
                hint: Some(NOT_FOUND_HINT.to_string()),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(request_id = %request_id, profile_id = %id, error = %e, "Profile lookup failed");
            error_response(StatusCode::BAD_GATEWAY, "Profile service unavailable")
        }
    }
}
