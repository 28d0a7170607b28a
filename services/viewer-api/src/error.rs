//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use map_common::MapError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub description: String,
}

/// An error returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, description: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                description: description.into(),
            },
        }
    }
}

impl From<MapError> for ApiError {
    fn from(e: MapError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, e.code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_not_found_is_404() {
        let err = ApiError::from(MapError::LayerNotFound("roads".to_string()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.code, "LayerNotDefined");
        assert!(err.body.description.contains("roads"));
    }

    #[test]
    fn test_invalid_viewport_is_400() {
        let err = ApiError::from(MapError::InvalidViewport("zoom".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "InvalidViewport");
    }
}
