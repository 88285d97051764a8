//! Loader for client configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML files and inline snippets first, then
//! `EVENTFUL__`-prefixed environment variables (`EVENTFUL__API_KEY`,
//! `EVENTFUL__DEFAULTS__LOCATION`, ...), so the environment wins. String values
//! may reference `${VAR}`, which is expanded before the typed structs are built.
//!
//! ```yaml
//! api_key: "${EVENTFUL_APP_KEY}"
//! endpoint: "http://api.eventful.com/json/events/search"
//! timeout_secs: 15
//! date_filter_policy: legacy        # or when_present
//! defaults:
//!   location: "Boston"
//!   within: 10
//!   sort_order: "date"
//! logging:
//!   format: text                    # or json
//!   stderr: true
//!   filter: "info,eventful_http=debug"
//! ```
use config::{Config, ConfigError, Environment, File};
use eventful_common::observability::LogFormat;
use eventful_search::DateFilterPolicy;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "EVENTFUL";

#[derive(Debug, Deserialize)]
pub struct EventfulConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default, deserialize_with = "flexible")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub date_filter_policy: DateFilterPolicy,
    #[serde(default)]
    pub defaults: SearchDefaults,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Fallbacks for search parameters the caller leaves out.
#[derive(Debug, Default, Deserialize)]
pub struct SearchDefaults {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub within: Option<i64>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default, deserialize_with = "flexible")]
    pub stderr: Option<bool>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    eventful_search::query::DEFAULT_ENDPOINT.into()
}

/// Environment values always arrive as text, so numbers and booleans accept either form.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flexible<T> {
    Native(T),
    Text(String),
}

fn flexible<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<Flexible<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flexible::Native(v)) => Ok(Some(v)),
        Some(Flexible::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("{s:?}: {e}"))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct EventfulConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for EventfulConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EventfulConfigLoader {
    /// Start empty; `EVENTFUL__` env overrides are layered on in [`Self::load`].
    ///
    /// ```
    /// use eventful_config::EventfulConfigLoader;
    ///
    /// let config = EventfulConfigLoader::new()
    ///     .with_yaml_str("api_key: 'abc123'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.api_key, "abc123");
    /// assert_eq!(config.endpoint, "http://api.eventful.com/json/events/search");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use eventful_config::EventfulConfigLoader;
    /// use eventful_search::DateFilterPolicy;
    ///
    /// let cfg = EventfulConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// api_key: "k"
    /// date_filter_policy: when_present
    /// defaults:
    ///   location: "Boston"
    ///   within: 10
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.date_filter_policy, DateFilterPolicy::WhenPresent);
    /// assert_eq!(cfg.defaults.location.as_deref(), Some("Boston"));
    /// assert_eq!(cfg.defaults.within, Some(10));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use eventful_config::EventfulConfigLoader;
    ///
    /// temp_env::with_var("EVENTFUL_APP_KEY", Some("injected-from-env"), || {
    ///     let config = EventfulConfigLoader::new()
    ///         .with_yaml_str(r#"api_key: "${EVENTFUL_APP_KEY}""#)
    ///         .load()
    ///         .expect("valid configuration");
    ///     assert_eq!(config.api_key, "injected-from-env");
    /// });
    /// ```
    ///
    /// # Errors
    ///
    /// Any source failing to parse, a type mismatch, or an `api_key` that is
    /// empty or still holds an unexpanded `${...}` reference.
    pub fn load(self) -> Result<EventfulConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: EventfulConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        let key = typed.api_key.trim();
        if key.is_empty() || key.contains("${") {
            return Err(ConfigError::Message(format!(
                "api_key is missing; set it in the config file or via {ENV_PREFIX}__API_KEY"
            )));
        }

        Ok(typed)
    }
}
