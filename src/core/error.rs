//! Typed error handling for the order service
//!
//! Every failure a handler can produce is a variant here, so the HTTP
//! status and body shape are decided in one place instead of per route.
//!
//! # Error categories
//!
//! - Client input errors (missing fields, unresolved references) → 400
//! - Not-found (valid id syntax, no matching document) → 404
//! - Authorization failures → 403 with an empty body, undifferentiated
//! - Everything else (malformed ids, database failures) → 500 with a
//!   generic body; the full detail is logged server-side only

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The service-wide error type.
///
/// Variants map 1:1 to the wire-visible failure modes. Infrastructure
/// failures are wrapped in [`ApiError::Internal`] and never leak detail
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// A required request field is absent or empty
    MissingFields,

    /// The submitted brand name does not match any known brand
    InvalidBrand,

    /// At least one submitted service name does not resolve
    InvalidServices,

    /// Registration attempted with an already-registered username
    UsernameTaken,

    /// Login attempted without username or password
    MissingCredentials,

    /// Login password does not match the stored hash
    InvalidPassword,

    /// No document with the given id ("Order", "User", ...)
    NotFound(&'static str),

    /// Missing, malformed, unsigned, or expired bearer token.
    /// Deliberately a single undifferentiated variant.
    Forbidden,

    /// Unexpected failure (storage, serialization, malformed ids)
    Internal(anyhow::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingFields => write!(f, "Missing Required Fields"),
            ApiError::InvalidBrand => write!(f, "Invalid Brand"),
            ApiError::InvalidServices => write!(f, "One Or More Invalid Services"),
            ApiError::UsernameTaken => write!(f, "Username Already Taken"),
            ApiError::MissingCredentials => write!(f, "Username And Password Required"),
            ApiError::InvalidPassword => write!(f, "Invalid Password"),
            ApiError::NotFound(resource) => write!(f, "{} Not Found", resource),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::Internal(_) => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Internal(e) => e.source(),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

/// JSON body sent for every non-403 error
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields
            | ApiError::InvalidBrand
            | ApiError::InvalidServices
            | ApiError::UsernameTaken
            | ApiError::MissingCredentials => StatusCode::BAD_REQUEST,
            ApiError::InvalidPassword => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = %err, cause = ?err.source(), "request failed");
        }

        let status = self.status_code();

        // Authorization rejections carry no body at all
        if matches!(self, ApiError::Forbidden) {
            return status.into_response();
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
