use std::{io, path::PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roadnet_core::Mode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Start-up failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("Invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("No graphs configured")]
    NoGraphs,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] roadnet_core::Error),
}

/// Request failures, rendered as a JSON `{"error": ...}` body
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Mode {0} is not served")]
    UnknownMode(Mode),
    #[error("Coordinate ({lat}, {lon}) is out of range")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Routing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Core(#[from] roadnet_core::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        use roadnet_core::Error as Core;

        match self {
            ApiError::UnknownMode(_) | ApiError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(Core::NoPath { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(Core::EmptyGraph) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(Core::InvalidData(_) | Core::InvalidNodeReference(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Core(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
