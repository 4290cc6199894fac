//! Tests for environment-driven configuration
//!
//! `TAGGED_LOGGER_LEVEL` and the installed subsystem are process state, so
//! this binary runs one sequential test.

use std::env;
use std::sync::Arc;
use tagged_logger::core::config::LEVEL_ENV_VAR;
use tagged_logger::prelude::*;
use tagged_logger::{default_subsystem, PlatformChannelKind};

#[test]
fn test_env_and_config_application() {
    env::remove_var(LEVEL_ENV_VAR);
    let config = DispatcherConfig::from_env().expect("defaults");
    assert_eq!(config, DispatcherConfig::default());

    env::set_var(LEVEL_ENV_VAR, "warning");
    let config = DispatcherConfig::from_env().expect("valid level");
    assert_eq!(config.min_severity, Severity::Warning);

    env::set_var(LEVEL_ENV_VAR, " Debug ");
    assert_eq!(
        DispatcherConfig::from_env().expect("valid level").min_severity,
        Severity::Debug
    );

    env::set_var(LEVEL_ENV_VAR, "loud");
    let result = DispatcherConfig::from_env();
    assert!(matches!(
        result,
        Err(LoggerError::InvalidConfiguration { ref component, .. }) if component == LEVEL_ENV_VAR
    ));
    env::remove_var(LEVEL_ENV_VAR);

    // Applying a config sets the threshold and installs the subsystem
    let config = DispatcherConfig::new()
        .with_min_severity(Severity::Error)
        .with_subsystem("com.example.configured");
    assert_eq!(config.platform, PlatformChannelKind::Stderr);

    let sink = Arc::new(MemorySink::new());
    let dispatcher = Dispatcher::builder()
        .config(&config)
        .shared_sink(sink.clone())
        .platform_channel(NullChannel)
        .build();

    assert_eq!(dispatcher.min_severity(), Severity::Error);
    assert_eq!(default_subsystem(), "com.example.configured");

    dispatcher.error(&LogTag::new("worker"), || "configured");
    dispatcher.flush().expect("flush");
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tag.subsystem(), "com.example.configured");

    // A later config does not replace the installed subsystem
    let _other = Dispatcher::builder()
        .config(&DispatcherConfig::new().with_subsystem("com.example.later"))
        .platform_channel(NullChannel)
        .build();
    assert_eq!(default_subsystem(), "com.example.configured");
}
