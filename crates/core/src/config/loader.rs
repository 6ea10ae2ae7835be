use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

const ENV_PREFIX: &str = "CARDCATALOG_";

/// Load configuration from file with environment variable overrides
///
/// Environment variables use the `CARDCATALOG_` prefix followed by the
/// section and the key, e.g. `CARDCATALOG_SERVER_PORT=9000` or
/// `CARDCATALOG_MTGJSON_INITIALIZE_ON_STARTUP=false`. Only the first `_`
/// after the prefix separates section from key.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_prefix(path, ENV_PREFIX)
}

fn load_config_with_prefix(path: &Path, prefix: &str) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(env_overrides(prefix))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Section names carry no underscores, key names may.
fn env_overrides(prefix: &str) -> Env {
    Env::prefixed(prefix).map(|key| key.as_str().replacen('_', ".", 1).into())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
