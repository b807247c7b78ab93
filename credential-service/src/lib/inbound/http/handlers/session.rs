use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedSession;

/// Echo the claims of the presented, already verified, session token.
pub async fn current_session(
    Extension(session): Extension<AuthenticatedSession>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            username: session.username,
            role: session.role,
            expires_at: session.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}
