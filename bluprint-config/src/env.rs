// Environment variable loading

use crate::{ConfigError, Result};
use std::env;
use std::path::Path;

/// Environment variable loader
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    /// Load a variable, treating unset and empty as absent
    pub fn load_opt(&self, key: &str) -> Option<String> {
        self.load_var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_opt(key).unwrap_or_else(|| default.to_string())
    }
}

/// Load a `.env` file into the process environment.
///
/// With no path the file is searched from the current directory upwards and a
/// missing file is not an error. An explicit path must exist.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        None => {
            if let Ok(found) = dotenvy::dotenv() {
                tracing::debug!(path = %found.display(), "Loaded .env file");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-wide; tests only read variables they
    // own (unique names) or rely on defaults.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::new(Some("BLUPRINT_TEST".to_string()));
        let result = loader.load_var("MISSING_VAR_67890");

        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    }

    #[test]
    fn test_env_loader_prefix_key() {
        let loader = EnvLoader::new(Some("MY_APP".to_string()));
        assert_eq!(loader.full_key("project_name"), "MY_APP_PROJECT_NAME");

        let loader = EnvLoader::default();
        assert_eq!(loader.full_key("project_name"), "PROJECT_NAME");
    }

    #[test]
    fn test_load_dotenv_missing_explicit_path() {
        let result = load_dotenv(Some(Path::new("/definitely/not/here/.env")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
