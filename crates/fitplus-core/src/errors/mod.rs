// ABOUTME: Unified error handling for the FitPlus platform with codes and context
// ABOUTME: Defines ErrorCode, AppError, AppResult and re-exports configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! # Unified Error Handling System
//!
//! Indeterminate measurements (a missing landmark, a zero-length limb) are
//! never errors in this platform: they travel as `None`. `AppError` is for
//! the cases that genuinely fail: misconfigured scoring profiles, unknown
//! sessions, and persistence calls that did not go through.

/// Configuration validation errors for profiles and exercise patterns
pub mod config;

pub use config::ConfigError;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Standard error codes used throughout the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request or frame data is malformed
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    /// Session or profile not found
    ResourceNotFound = 4000,
    /// Session is closed and no longer accepts writes
    ResourceLocked = 4002,

    // External Services (5000-5999)
    /// Persistence backend rejected or failed the call
    ExternalServiceError = 5000,

    // Configuration (6000-6999)
    /// Configuration is present but invalid
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Serialization or deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceLocked => "The resource is closed and cannot be modified",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether a retry of the same call could succeed
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::ExternalServiceError)
    }
}

/// Unified error type for the platform
#[derive(Debug, Error)]
#[error("{}: {message}", .code.description())]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Resource is closed for writes
    pub fn locked(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceLocked,
            format!("{} is closed", resource.into()),
        )
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigInvalid, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_maps_to_config_invalid() {
        let error: AppError = ConfigError::EmptyProfile.into();
        assert_eq!(error.code, ErrorCode::ConfigInvalid);
        assert!(error.source.is_some());
    }

    #[test]
    fn test_env_var_error_maps_to_config_invalid() {
        let error: AppError = ConfigError::EnvVar(std::env::VarError::NotPresent).into();
        assert_eq!(error.code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_display_includes_description_and_message() {
        let error = AppError::not_found("Session abc");
        let rendered = error.to_string();
        assert!(rendered.contains("not found"));
        assert!(rendered.contains("Session abc"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ConfigInvalid).unwrap();
        assert_eq!(json, "\"CONFIG_INVALID\"");
    }

    #[test]
    fn test_transient_codes() {
        assert!(ErrorCode::ExternalServiceError.is_transient());
        assert!(!ErrorCode::ConfigInvalid.is_transient());
    }
}
