use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the connection string the river endpoint reads.
pub const DB_CONNECTION_KEY: &str = "DbConnection";

// Environment variable prefixes checked for connection strings, highest precedence first.
// `ConnectionStrings__<name>` is the generic form, the rest are what App Service injects.
const CONNECTION_STRING_ENV_PREFIXES: [&str; 4] = [
    "ConnectionStrings__",
    "SQLAZURECONNSTR_",
    "SQLCONNSTR_",
    "CUSTOMCONNSTR_",
];

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub listen: Option<String>,
    // Named connection strings, e.g. `DbConnection = "Server=tcp:..."`.
    #[serde(default)]
    pub connection_strings: HashMap<String, String>,
    // Timeout in seconds for establishing the database connection (TCP + login).
    // If not set, the driver and OS defaults apply.
    pub connect_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Loads `path` if it exists, falls back to defaults otherwise, then applies
    /// connection string overrides from the process environment.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for prefix in CONNECTION_STRING_ENV_PREFIXES {
            let var = format!("{}{}", prefix, DB_CONNECTION_KEY);
            match lookup(&var) {
                Some(value) if !value.trim().is_empty() => {
                    self.connection_strings
                        .insert(DB_CONNECTION_KEY.to_string(), value);
                    return;
                }
                _ => {}
            }
        }
    }

    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings.get(name).map(String::as_str)
    }
}
