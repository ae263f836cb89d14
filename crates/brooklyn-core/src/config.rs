use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::BrooklynClient;
use crate::error::{ApplicationError, Result};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "brooklyn.toml";

/// Connection settings for the Brooklyn server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub skip_ssl_checks: bool,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_url.is_empty() {
            return Err(ApplicationError::Config("endpoint_url is required".into()));
        }
        let url = Url::parse(&self.endpoint_url).map_err(|e| {
            ApplicationError::Config(format!("endpoint_url '{}': {e}", self.endpoint_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApplicationError::Config(format!(
                "endpoint_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.access_key.is_empty() {
            return Err(ApplicationError::Config("access_key is required".into()));
        }
        if self.secret_key.is_empty() {
            return Err(ApplicationError::Config("secret_key is required".into()));
        }
        Ok(())
    }

    pub fn client(&self) -> Result<BrooklynClient> {
        Ok(BrooklynClient::new(
            &self.endpoint_url,
            &self.access_key,
            &self.secret_key,
            self.skip_ssl_checks,
        )?)
    }
}

/// Load settings from an optional TOML file, then `BROOKLYN__*` environment
/// variables (e.g. `BROOKLYN__ENDPOINT_URL`), which take precedence.
///
/// The result is not validated; callers apply their own overrides first.
pub fn load_config(path: Option<&str>) -> Result<ProviderConfig> {
    let mut builder = Config::builder();
    let file = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
    if file.exists() {
        builder = builder.add_source(File::from(file));
    } else if let Some(p) = path {
        return Err(ApplicationError::Config(format!("config file not found: {p}")));
    }

    builder = builder.add_source(
        Environment::with_prefix("BROOKLYN")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|e| ApplicationError::Config(format!("config build error: {e}")))?
        .try_deserialize()
        .map_err(|e| ApplicationError::Config(format!("config deserialize error: {e}")))
}
