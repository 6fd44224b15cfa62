//! Environment settings loaded from files and process variables

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::environment::{Environment, Secret};
use crate::http::Scheme;

/// Prefix of process variables overriding file settings
pub const ENV_PREFIX: &str = "COURIER";

/// Secret settings, tagged by `kind`
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SecretConfig {
    /// Appended as the last query item
    Query {
        /// Query item name
        name: String,
        /// Query item value
        value: String,
    },
    /// Written as a header after all other headers
    Header {
        /// Header name
        name: String,
        /// Header value
        value: String,
    },
}

impl std::fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, name) = match self {
            SecretConfig::Query { name, .. } => ("query", name),
            SecretConfig::Header { name, .. } => ("header", name),
        };

        f.debug_struct("SecretConfig")
            .field("kind", &kind)
            .field("name", name)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl From<SecretConfig> for Secret {
    fn from(secret: SecretConfig) -> Self {
        match secret {
            SecretConfig::Query { name, value } => Secret::query_item(name, value),
            SecretConfig::Header { name, value } => Secret::header(name, value),
        }
    }
}

/// Serializable form of an [`Environment`]
///
/// ```toml
/// scheme = "https"
/// endpoint = "api.example.org"
/// port = 8443
/// base_path = "v1"
///
/// [headers]
/// Accept = "application/json"
///
/// [secret]
/// kind = "header"
/// name = "X-API-KEY"
/// value = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// `"https"` or `"http"`
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Host name or IP literal
    pub endpoint: String,
    /// Explicit port
    #[serde(default)]
    pub port: Option<u16>,
    /// Prefix joined in front of every request path
    #[serde(default)]
    pub base_path: Option<String>,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Credential injected into every request
    #[serde(default)]
    pub secret: Option<SecretConfig>,
}

fn default_scheme() -> String {
    Scheme::Secure.as_str().to_string()
}

impl EnvironmentConfig {
    /// Load from `path`, overridden by `COURIER_*` process variables
    ///
    /// Nested keys use `__`, e.g. `COURIER_SECRET__VALUE`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`EnvironmentConfig::from_file`] with a custom variable prefix
    pub fn from_file_with_prefix<P: AsRef<Path>>(path: P, prefix: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy().to_string();

        let config: Config = Config::builder()
            // file contents
            .add_source(File::with_name(&path))
            // overridden by the process environment
            .add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: EnvironmentConfig = config.try_deserialize()?;
        tracing::debug!(
            "Loaded environment {}-{} from {}",
            settings.scheme,
            settings.endpoint,
            path
        );

        Ok(settings)
    }
}

impl TryFrom<EnvironmentConfig> for Environment {
    type Error = ConfigError;

    fn try_from(settings: EnvironmentConfig) -> Result<Self, Self::Error> {
        let scheme: Scheme = settings.scheme.parse().map_err(ConfigError::Message)?;

        let mut builder = Environment::builder(scheme, settings.endpoint).headers(settings.headers);

        if let Some(port) = settings.port {
            builder = builder.port(port);
        }
        if let Some(base_path) = settings.base_path {
            builder = builder.base_path(base_path);
        }
        if let Some(secret) = settings.secret {
            builder = builder.secret(secret.into());
        }

        Ok(builder.build())
    }
}
