use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileResponseData;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let command = RegisterCommand::parse(body.username, body.email, body.password)?;

    state
        .credential_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|view| ApiSuccess::new(StatusCode::CREATED, view.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    #[serde(default)]
    email: Option<String>,
}
