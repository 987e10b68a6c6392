use std::io;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

mod connection_string;

pub use connection_string::StorageConnection;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
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
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Table/blob/queue/file backend settings.
///
/// `connection_string` uses the `Key=Value;` form, see [`StorageConnection`].
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub connection_string: String,
    #[serde(default = "default_customer_table")]
    pub customer_table: String,
    #[serde(default = "default_product_table")]
    pub product_table: String,
    #[serde(default = "default_order_table")]
    pub order_table: String,
    #[serde(default = "default_blob_container")]
    pub blob_container: String,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    #[serde(default = "default_file_share")]
    pub file_share: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            customer_table: default_customer_table(),
            product_table: default_product_table(),
            order_table: default_order_table(),
            blob_container: default_blob_container(),
            queue_name: default_queue_name(),
            file_share: default_file_share(),
        }
    }
}

fn default_customer_table() -> String { "CustomerProfiles".into() }
fn default_product_table() -> String { "Products".into() }
fn default_order_table() -> String { "Orders".into() }
fn default_blob_container() -> String { "product-images".into() }
fn default_queue_name() -> String { "retail-notifications".into() }
fn default_file_share() -> String { "contracts".into() }

/// Relational backend settings. An empty `url` disables the relational path.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_max_retry_delay")]
    pub max_retry_delay_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            max_retries: default_max_retries(),
            max_retry_delay_secs: default_max_retry_delay(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_max_retries() -> u32 { 5 }
fn default_max_retry_delay() -> u64 { 30 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// `Ok(None)` when the file does not exist. Read and parse errors are returned.
pub fn load_from_file(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content)
            .map(Some)
            .map_err(|e| anyhow!("配置文件 {path} 解析失败: {e}")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("读取配置文件 {path} 失败: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), then apply environment
    /// fallbacks and validate. Only a missing file falls back to defaults.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?.unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 存储连接串与资源名
        self.storage.normalize_from_env();
        self.storage.validate()?;
        // 归一化 database（支持从环境变量填充 URL；为空则关闭关系库）
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if self.connection_string.trim().is_empty() {
            if let Ok(cs) = std::env::var("STORAGE_CONNECTION_STRING") {
                self.connection_string = cs;
            }
        }
    }

    /// Parsed form of `connection_string`.
    pub fn connection(&self) -> Result<StorageConnection> {
        StorageConnection::parse(&self.connection_string)
    }

    pub fn validate(&self) -> Result<()> {
        self.connection()?;
        for (field, name) in [
            ("storage.customer_table", &self.customer_table),
            ("storage.product_table", &self.product_table),
            ("storage.order_table", &self.order_table),
        ] {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(anyhow!("{field} 只能包含字母和数字，且不能为空"));
            }
        }
        for (field, name) in [
            ("storage.blob_container", &self.blob_container),
            ("storage.queue_name", &self.queue_name),
            ("storage.file_share", &self.file_share),
        ] {
            let ok = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !ok {
                return Err(anyhow!("{field} 只能包含小写字母、数字和 '-'，且不能为空"));
            }
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    /// Relational service is only wired when a URL is configured.
    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}
