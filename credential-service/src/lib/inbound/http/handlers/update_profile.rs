use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use super::ProfileResponseData;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a profile (raw JSON)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let user_id = parse_user_id(&id)?;
    caller.ensure_owns(&user_id)?;

    let command = UpdateProfileCommand::parse(req.username, req.email, req.password)?;

    state
        .credential_service
        .update_profile(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|view| ApiSuccess::new(StatusCode::OK, view.into()))
}
