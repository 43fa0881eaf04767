//! Error handling

use axum::response::IntoResponse;
use tracing::info;

/// definitions for the memesmith application.
#[derive(Debug)]
pub enum MemeError {
    /// When you didn't do the right thing
    BadRequest,
    /// When a requested resource is not found
    NotFound(String),
    /// When the compositor cannot produce an image (no usable font, or
    /// the input image could not be normalized)
    Render(String),
    /// When a hosted image service rejects a generation request
    ImageGeneration(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<std::io::Error> for MemeError {
    fn from(err: std::io::Error) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl From<image::ImageError> for MemeError {
    fn from(err: image::ImageError) -> Self {
        MemeError::Render(err.to_string())
    }
}

impl From<axum::http::Error> for MemeError {
    fn from(err: axum::http::Error) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for MemeError {
    fn from(err: tower_sessions::session::Error) -> Self {
        MemeError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for MemeError {
    fn into_response(self) -> axum::response::Response {
        match self {
            MemeError::BadRequest => {
                info!("Bad request received");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Bad Request"));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            MemeError::NotFound(url) => {
                tracing::error!("404 {url}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Not Found"));
                *response.status_mut() = axum::http::StatusCode::NOT_FOUND;
                response
            }
            MemeError::Render(message) => {
                tracing::error!("Render failure: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Render failure"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
            MemeError::ImageGeneration(message) => {
                tracing::error!("Image generation error: {}", message);
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Image generation failed",
                ));
                *response.status_mut() = axum::http::StatusCode::BAD_GATEWAY;
                response
            }
            MemeError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
