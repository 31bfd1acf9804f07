use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
        }
    }
}

/// Where laboratory records are persisted on disk. The path may be omitted
/// from the TOML; it is then taken from `STORAGE_PATH`, or the default.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: String,
}

fn default_storage_path() -> String {
    "data/laboratories.json".to_string()
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 {
                self.worker_threads = Some(4);
            }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    /// If the TOML omits the path, allow the environment to supply it.
    pub fn normalize_from_env(&mut self) {
        self.fill_missing(std::env::var("STORAGE_PATH").ok());
    }

    fn fill_missing(&mut self, env_path: Option<String>) {
        if self.path.trim().is_empty() {
            if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
                self.path = path;
            }
        }
        if self.path.trim().is_empty() {
            self.path = default_storage_path();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!(
                "storage.path is empty; provide it in config.toml or the STORAGE_PATH environment variable"
            ));
        }
        if !self.path.ends_with(".json") {
            return Err(anyhow!("storage.path must point to a .json file"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults valid");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.path, "data/laboratories.json");
    }

    #[test]
    fn parses_full_config() {
        let toml_src = r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            worker_threads = 2

            [storage]
            path = "data/labs.json"
        "#;
        let mut cfg: AppConfig = toml::from_str(toml_src).expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.storage.path, "data/labs.json");
    }

    #[test]
    fn missing_storage_path_takes_env_then_default() {
        // Config file present but [storage] omitted: env value wins.
        let mut cfg: AppConfig = toml::from_str("[server]\nhost = \"127.0.0.1\"\nport = 8081\n")
            .expect("parse");
        cfg.storage.fill_missing(Some("data/from_env.json".into()));
        cfg.storage.validate().expect("valid");
        assert_eq!(cfg.storage.path, "data/from_env.json");

        // No env value either: the default applies.
        let mut storage = StorageConfig::default();
        storage.fill_missing(None);
        assert_eq!(storage.path, "data/laboratories.json");

        // A blank env value is ignored, not adopted.
        let mut storage = StorageConfig::default();
        storage.fill_missing(Some("   ".into()));
        assert_eq!(storage.path, "data/laboratories.json");
    }

    #[test]
    fn explicit_storage_path_is_kept_over_env() {
        let mut storage = StorageConfig {
            path: "data/explicit.json".into(),
        };
        storage.fill_missing(Some("data/from_env.json".into()));
        assert_eq!(storage.path, "data/explicit.json");
    }

    #[test]
    fn rejects_non_json_storage_path() {
        let cfg = StorageConfig {
            path: "data/labs.db".into(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_worker_threads_falls_back() {
        let mut server = ServerConfig {
            host: " ".into(),
            port: 8080,
            worker_threads: Some(0),
        };
        server.normalize().expect("normalized");
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.worker_threads, Some(4));
    }
}
