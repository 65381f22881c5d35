use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use super::ProfileResponseData;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    caller.ensure_owns(&user_id)?;

    let view = state.credential_service.get_profile(&user_id).await?;

    Ok(ApiSuccess::new(StatusCode::OK, view.into()))
}
