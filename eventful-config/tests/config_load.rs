use eventful_common::observability::LogFormat;
use eventful_config::EventfulConfigLoader;
use eventful_search::DateFilterPolicy;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
api_key: "${EVENTFUL_APP_KEY}"
timeout_secs: 20
date_filter_policy: when_present
defaults:
  location: "Boston"
  within: 10
  sort_order: "date"
logging:
  format: json
  stderr: true
  filter: "debug"
"#;

#[test]
#[serial]
fn loads_file_and_expands_key() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "eventful.yaml", FILE_YAML);

    let config = temp_env::with_var("EVENTFUL_APP_KEY", Some("from-env"), || {
        EventfulConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.api_key, "from-env");
    assert_eq!(config.timeout_secs, Some(20));
    assert_eq!(config.date_filter_policy, DateFilterPolicy::WhenPresent);
    assert_eq!(config.defaults.location.as_deref(), Some("Boston"));
    assert_eq!(config.defaults.within, Some(10));
    assert_eq!(config.defaults.sort_order.as_deref(), Some("date"));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.stderr, Some(true));
    assert_eq!(config.endpoint, "http://api.eventful.com/json/events/search");
}

#[test]
#[serial]
fn prefixed_env_overrides_the_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "eventful.yaml", FILE_YAML);

    let config = temp_env::with_vars(
        [
            ("EVENTFUL_APP_KEY", Some("from-file-ref")),
            ("EVENTFUL__API_KEY", Some("from-override")),
            ("EVENTFUL__TIMEOUT_SECS", Some("3")),
            ("EVENTFUL__DEFAULTS__LOCATION", Some("Cambridge")),
        ],
        || {
            EventfulConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config")
        },
    );

    assert_eq!(config.api_key, "from-override");
    assert_eq!(config.timeout_secs, Some(3));
    assert_eq!(config.defaults.location.as_deref(), Some("Cambridge"));
    assert_eq!(config.defaults.within, Some(10));
}

#[test]
#[serial]
fn env_only_deployment_with_missing_optional_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("absent.yaml");

    let config = temp_env::with_var("EVENTFUL__API_KEY", Some("env-only"), || {
        EventfulConfigLoader::new()
            .with_optional_file(&missing)
            .load()
            .expect("load config")
    });

    assert_eq!(config.api_key, "env-only");
    assert_eq!(config.date_filter_policy, DateFilterPolicy::Legacy);
    assert!(config.defaults.location.is_none());
}

#[test]
#[serial]
fn unresolved_key_is_rejected() {
    let result = temp_env::with_var_unset("EVENTFUL_APP_KEY", || {
        EventfulConfigLoader::new()
            .with_yaml_str(r#"api_key: "${EVENTFUL_APP_KEY}""#)
            .load()
    });

    let err = result.expect_err("key must be required");
    assert!(err.to_string().contains("api_key is missing"));
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let result = EventfulConfigLoader::new()
        .with_file(tmp.path().join("nope.yaml"))
        .load();
    assert!(result.is_err());
}
