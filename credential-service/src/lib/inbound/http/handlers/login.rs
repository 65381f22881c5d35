use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginView;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let command = LoginCommand {
        username: body.username,
        password: body.password,
    };

    state
        .credential_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|view| ApiSuccess::new(StatusCode::OK, view.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub id: String,
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginView> for LoginResponseData {
    fn from(view: LoginView) -> Self {
        Self {
            id: view.id.to_string(),
            username: view.username,
            token: view.access_token,
            expires_at: view.expires_at,
        }
    }
}
