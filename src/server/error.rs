use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

use crate::domain::Domain;
use crate::system::ProviderError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", domain.server_failure_message())]
    ProviderUnavailable {
        domain: Domain,
        #[source]
        source: ProviderError,
    },

    #[error("No GPU controller found")]
    NoDevice,
}

impl ApiError {
    pub fn provider(domain: Domain, source: ProviderError) -> Self {
        ApiError::ProviderUnavailable { domain, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProviderUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoDevice => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::ProviderUnavailable { domain, source } => {
                warn!(%domain, error = %source, "provider call failed");
            }
            ApiError::NoDevice => warn!("no GPU controller reported"),
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
