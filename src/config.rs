// src/config.rs

use crate::constants::*;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Overrides the app data directory location of the database.
    pub db_path: Option<PathBuf>,
    /// Hard-coded admin pair; sign-in falls back to stored accounts when unset.
    pub admin: Option<AdminCredentials>,
    pub seed_on_first_run: bool,
}

impl Config {
    /// Reads the process environment. Callers load `.env` beforehand.
    pub fn load() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        info!(
            "Config: db_path={:?}, admin pair configured={}, seed={}",
            config.db_path,
            config.admin.is_some(),
            config.seed_on_first_run
        );
        config
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin = match (var(ENV_ADMIN_USERNAME), var(ENV_ADMIN_PASSWORD)) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            (None, None) => None,
            _ => {
                warn!(
                    "Only one of {} / {} is set; ignoring the admin pair",
                    ENV_ADMIN_USERNAME, ENV_ADMIN_PASSWORD
                );
                None
            }
        };

        let seed_on_first_run = match var(ENV_SEED).as_deref() {
            None => true,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    warn!("Invalid {} value '{}', seeding anyway", ENV_SEED, other);
                    true
                }
            },
        };

        Config {
            db_path: var(ENV_DB_PATH).map(PathBuf::from),
            admin,
            seed_on_first_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert!(config.db_path.is_none());
        assert!(config.admin.is_none());
        assert!(config.seed_on_first_run);
    }

    #[test]
    fn admin_pair_requires_both_halves() {
        let config = config_from(&[(ENV_ADMIN_USERNAME, "root")]);
        assert!(config.admin.is_none());

        let config = config_from(&[(ENV_ADMIN_USERNAME, "root"), (ENV_ADMIN_PASSWORD, "hunter2")]);
        assert_eq!(
            config.admin,
            Some(AdminCredentials {
                username: "root".into(),
                password: "hunter2".into(),
            })
        );
    }

    #[test]
    fn seed_flag_parses_common_spellings() {
        assert!(!config_from(&[(ENV_SEED, "off")]).seed_on_first_run);
        assert!(!config_from(&[(ENV_SEED, "FALSE")]).seed_on_first_run);
        assert!(config_from(&[(ENV_SEED, "maybe")]).seed_on_first_run);
    }
}
