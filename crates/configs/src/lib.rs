use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 4000 }
fn default_data_file() -> String { "data/resources.json".into() }
fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn default_config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); without a file, start from defaults
    /// and apply `SERVER_HOST`, `SERVER_PORT`, `DATA_FILE`, `LOG_FORMAT`,
    /// `TOKIO_WORKER_THREADS`.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&default_config_path())
    }

    /// Only a missing file falls back to env; a file that cannot be read or
    /// parsed is an error.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("cannot load config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(file) = std::env::var("DATA_FILE") {
            cfg.storage.data_file = file;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "compact" | "json" => Ok(()),
            other => Err(anyhow!("logging.format must be `compact` or `json`, got `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            worker_threads = 2

            [storage]
            data_file = "/var/lib/registry/resources.json"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.storage.data_file, "/var/lib/registry/resources.json");
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let mut cfg = parse("[server]\nport = 9000\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.data_file, "data/resources.json");
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = parse("[server]\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[storage]\ndata_file = \" \"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[logging]\nformat = \"pretty\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(tag: &str, content: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("registry_config_{tag}_{}_{nanos}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let path = temp_config("malformed", "[server]\nport = \"not-a-number\"\n[storage]\ndata_file = \"/srv/custom.json\"\n");
        let res = AppConfig::load_and_validate_from(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        assert!(res.is_err());
    }

    #[test]
    fn existing_file_is_used() {
        let path = temp_config("existing", "[storage]\ndata_file = \"/srv/custom.json\"\n");
        let cfg = AppConfig::load_and_validate_from(path.to_str().unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.storage.data_file, "/srv/custom.json");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("registry_config_does_not_exist.toml");
        let cfg = AppConfig::load_and_validate_from(path.to_str().unwrap()).unwrap();
        assert!(!cfg.storage.data_file.trim().is_empty());
        assert!(cfg.server.port > 0);
    }
}
