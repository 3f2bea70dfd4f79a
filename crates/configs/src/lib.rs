use std::path::{Path, PathBuf};

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
    pub auth: AuthConfig,
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

/// Where each resource document lives on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    #[serde(default = "default_rankings_file")]
    pub rankings_file: String,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
    /// The chart catalog is served as a static asset, so it sits under the frontend tree.
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            settings_file: default_settings_file(),
            rankings_file: default_rankings_file(),
            frontend_dir: default_frontend_dir(),
            chart_path: default_chart_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// The single identity allowed to replace the chart catalog.
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_user: default_admin_user(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3937 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_users_file() -> String { "users.json".into() }
fn default_settings_file() -> String { "user_settings.json".into() }
fn default_rankings_file() -> String { "rankings.json".into() }
fn default_frontend_dir() -> PathBuf { PathBuf::from("frontend") }
fn default_chart_path() -> PathBuf { PathBuf::from("frontend/assets/chart.json") }
fn default_admin_user() -> String { "admin".into() }
fn default_argon2_memory_kib() -> u32 { 19 * 1024 }
fn default_argon2_iterations() -> u32 { 2 }
fn default_argon2_parallelism() -> u32 { 1 }

/// Load `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_overrides();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `SERVER_HOST`, `SERVER_PORT`, `DATA_DIR` and `ADMIN_USER` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(admin) = std::env::var("ADMIN_USER") {
            self.auth.admin_user = admin;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.auth.normalize_and_validate()?;
        Ok(())
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
        // 未配置或为 0 时回退到 4 个工作线程
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn users_path(&self) -> PathBuf { self.data_dir.join(&self.users_file) }
    pub fn settings_path(&self) -> PathBuf { self.data_dir.join(&self.settings_file) }
    pub fn rankings_path(&self) -> PathBuf { self.data_dir.join(&self.rankings_file) }

    pub fn validate(&self) -> Result<()> {
        for (name, file) in [
            ("storage.users_file", &self.users_file),
            ("storage.settings_file", &self.settings_file),
            ("storage.rankings_file", &self.rankings_file),
        ] {
            if file.trim().is_empty() {
                return Err(anyhow!("{name} must not be empty"));
            }
        }
        // 每个资源独占一个文件，不允许共享
        if self.users_file == self.settings_file
            || self.users_file == self.rankings_file
            || self.settings_file == self.rankings_file
        {
            return Err(anyhow!("storage files must be distinct per resource"));
        }
        if self.chart_path.as_os_str().is_empty() {
            return Err(anyhow!("storage.chart_path must not be empty"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        self.admin_user = self.admin_user.trim().to_string();
        if self.admin_user.is_empty() {
            return Err(anyhow!("auth.admin_user must not be empty"));
        }
        if self.argon2_iterations == 0 || self.argon2_parallelism == 0 {
            return Err(anyhow!("auth.argon2_iterations and auth.argon2_parallelism must be >= 1"));
        }
        if self.argon2_memory_kib < self.argon2_parallelism.saturating_mul(8) {
            return Err(anyhow!("auth.argon2_memory_kib must be >= 8 * argon2_parallelism"));
        }
        Ok(())
    }
}
