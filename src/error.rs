use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid goal: {nutrient} target must be positive")]
    InvalidGoal { nutrient: &'static str },

    #[error("invalid food: {0}")]
    InvalidFood(String),

    #[error("daily log was modified concurrently")]
    Conflict,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidDate(_) => StatusCode::BAD_REQUEST,
            Error::InvalidGoal { .. } | Error::InvalidFood(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Storage(e.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
