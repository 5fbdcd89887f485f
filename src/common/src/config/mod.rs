use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Configuration file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cratedb-adapter.toml";

/// Prefix of environment variables overriding configuration keys
pub const ENV_PREFIX: &str = "CRATE_ADAPTER__";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the remote read/write endpoints listen on
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0:9268"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// URL of the CrateDB SQL HTTP endpoint
    pub url: String,
    /// Table holding the samples
    pub table: String,
    /// Upper bound for a single request to the store
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://localhost:4200/_sql"),
            table: String::from("metrics"),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl Configuration {
    /// Load defaults, then `cratedb-adapter.toml`, then the environment
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(Box::new)
    }

    /// Load defaults, then the given TOML file, then the environment
    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(path)).extract().map_err(Box::new)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
