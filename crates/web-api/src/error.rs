use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use cdr_analytics_insights::InsightsError;

/// HTTP-facing error: a status code plus a plain-text message body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: String::new(),
        }
    }

    pub fn internal(err: &anyhow::Error) -> Self {
        tracing::error!("request failed: {err:#}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal error".to_string(),
        }
    }
}

impl From<InsightsError> for ApiError {
    fn from(err: InsightsError) -> Self {
        match err {
            InsightsError::EmptyDataset => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            InsightsError::Store(e) => Self::internal(&e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
