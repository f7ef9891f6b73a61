//! Failures of the river endpoint and how they map onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

#[derive(thiserror::Error, Debug)]
pub enum RiverError {
    /// No usable `DbConnection` connection string was configured.
    #[error("Error: DB connection string 'DbConnection' not found in Azure configuration. Check App Service Settings.")]
    ConfigurationMissing,

    /// Connecting, querying or reading rows failed.
    #[error("Database Access Error: {0}")]
    DataAccess(String),
}

impl From<tiberius::error::Error> for RiverError {
    fn from(e: tiberius::error::Error) -> Self {
        RiverError::DataAccess(e.to_string())
    }
}

impl From<std::io::Error> for RiverError {
    fn from(e: std::io::Error) -> Self {
        RiverError::DataAccess(e.to_string())
    }
}

impl IntoResponse for RiverError {
    fn into_response(self) -> Response {
        match &self {
            RiverError::ConfigurationMissing => warn!("Rejecting request: {}", self),
            RiverError::DataAccess(msg) => error!(details = %msg, "Database access failed"),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            RiverError::ConfigurationMissing.to_string(),
            "Error: DB connection string 'DbConnection' not found in Azure configuration. Check App Service Settings."
        );
        assert_eq!(
            RiverError::DataAccess("login failed".into()).to_string(),
            "Database Access Error: login failed"
        );
    }

    #[test]
    fn io_errors_become_data_access() {
        let e = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        match RiverError::from(e) {
            RiverError::DataAccess(msg) => assert!(msg.contains("refused")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn both_kinds_are_500_plain_text() {
        for err in [
            RiverError::ConfigurationMissing,
            RiverError::DataAccess("boom".into()),
        ] {
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let ct = resp
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert!(ct.starts_with("text/plain"), "content type was {}", ct);
        }
    }
}
