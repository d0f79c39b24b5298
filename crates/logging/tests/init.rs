//! Installing the global subscriber.
//!
//! Lives in its own test binary because the subscriber is process-wide.

#![cfg(feature = "tracing")]

use logging::{LogConfig, LogLevel, LoggingError, init_tracing};

#[test]
fn second_installation_is_reported() {
    let config = LogConfig::from_verbosity(2).with_target("filebuf::map", LogLevel::Trace);
    init_tracing(&config).unwrap();
    tracing::info!(target: "filebuf::io", path = "demo.bin", "subscriber ready");

    let err = init_tracing(&config).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialized(_)));
}
