// ABOUTME: Tests for logging configuration and environment variable handling
// ABOUTME: Validates defaults, format parsing, and environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fitplus::logging::{LogFormat, LoggingConfig, SERVICE_NAME};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("SERVICE_NAME", "replay-bench");
    env::set_var("LOG_INCLUDE_SPANS", "1");

    let config = LoggingConfig::from_env();

    env::remove_var("RUST_LOG");
    env::remove_var("LOG_FORMAT");
    env::remove_var("SERVICE_NAME");
    env::remove_var("LOG_INCLUDE_SPANS");

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.service_name, "replay-bench");
    assert!(config.include_spans);
    assert!(!config.to_stderr);
}

#[test]
#[serial]
fn test_unknown_format_falls_back_to_pretty() {
    env::set_var("LOG_FORMAT", "xml");
    let config = LoggingConfig::from_env();
    env::remove_var("LOG_FORMAT");
    assert_eq!(config.format, LogFormat::Pretty);
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.service_name, SERVICE_NAME);
    assert!(!config.include_location);
    assert!(config.with_stderr().to_stderr);
}

#[test]
fn test_log_format_parsing() {
    assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert!("yaml".parse::<LogFormat>().is_err());
}
