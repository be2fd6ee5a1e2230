use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the REST boundary. Every variant renders as a JSON
/// body with a `message` field; `NeedsSetup` additionally carries the
/// `needsSetup` flag clients branch on.
///
/// An ownership mismatch on inventory maps to `NotFound`, indistinguishable
/// from a row that does not exist, so one pharmacy's operators cannot probe
/// another's listings.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Please set up your pharmacy first")]
    NeedsSetup,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap an unexpected storage failure: the cause is logged, the caller
    /// only sees the endpoint's generic message.
    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        log::error!("{message}: {cause}");
        ApiError::Internal(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_)
            | ApiError::Conflict(_)
            | ApiError::BadRequest(_)
            | ApiError::NeedsSetup => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::internal("Internal server error", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NeedsSetup => json!({
                "message": self.to_string(),
                "needsSetup": true,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_rest_contract() {
        assert_eq!(
            ApiError::NotFound("Inventory item not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        // "already linked" is a conflict internally but 400 on the wire.
        assert_eq!(
            ApiError::Conflict("User already associated with a pharmacy".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NeedsSetup.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn needs_setup_carries_the_flag() {
        let err = ApiError::NeedsSetup;
        assert_eq!(err.to_string(), "Please set up your pharmacy first");
    }

    #[test]
    fn validation_message_is_surfaced_verbatim() {
        let err = ApiError::Validation("quantity must be zero or greater".into());
        assert_eq!(err.to_string(), "quantity must be zero or greater");
    }
}
