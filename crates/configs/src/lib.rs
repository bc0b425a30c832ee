use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        // blank host / port 0 mean "unset": resolved from env, then 127.0.0.1:8000
        Self { host: String::new(), port: 0 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    File,
    Memory,
}

/// Object store location and the two well-known blob keys.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Custom S3-compatible endpoint (e.g. MinIO); path-style addressing is used when set.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default)]
    pub utilities_file_key: String,
    #[serde(default)]
    pub submissions_file_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: String::new(),
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            root_dir: default_root_dir(),
            utilities_file_key: String::new(),
            submissions_file_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            benchmark: default_benchmark(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { frontend_url: default_frontend_url() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// `compact` (default) or `json`
    #[serde(default)]
    pub format: String,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

/// Vite dev server origin, always allowed alongside `cors.frontend_url`.
pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";

fn default_region() -> String { "us-east-1".into() }
fn default_root_dir() -> String { "data".into() }
fn default_geocoding_base_url() -> String { "https://geocoding.geo.census.gov/geocoder".into() }
fn default_benchmark() -> String { "Public_AR_Current".into() }
fn default_geocoding_timeout() -> u64 { 10 }
fn default_frontend_url() -> String { DEV_FRONTEND_ORIGIN.into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
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
    /// Load `config.toml` if present (otherwise defaults), fill blanks from the
    /// environment, then validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_with(|key| std::env::var(key).ok())
    }

    /// Same as [`normalize_and_validate`](Self::normalize_and_validate) with an
    /// injectable environment lookup.
    pub fn normalize_with<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.normalize(&env)?;
        self.storage.normalize_from_env(&env);
        self.storage.validate()?;
        self.geocoding.validate()?;
        if let Some(url) = env("FRONTEND_URL").filter(|v| !v.trim().is_empty()) {
            self.cors.frontend_url = url;
        }
        Ok(())
    }

    /// Distinct CORS origins: the Vite dev server plus the configured frontend.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![DEV_FRONTEND_ORIGIN.to_string()];
        let frontend = self.cors.frontend_url.trim();
        if !frontend.is_empty() && frontend != DEV_FRONTEND_ORIGIN {
            origins.push(frontend.to_string());
        }
        origins
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|e| e.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn fill_blank<F>(slot: &mut String, env: &F, key: &str)
where
    F: Fn(&str) -> Option<String>,
{
    if slot.trim().is_empty() {
        if let Some(v) = env(key) {
            *slot = v;
        }
    }
}

fn fill_none<F>(slot: &mut Option<String>, env: &F, key: &str)
where
    F: Fn(&str) -> Option<String>,
{
    if slot.as_deref().map(str::trim).unwrap_or("").is_empty() {
        *slot = env(key).filter(|v| !v.trim().is_empty());
    }
}

impl ServerConfig {
    fn normalize<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fill_blank(&mut self.host, env, "SERVER_HOST");
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            if let Some(p) = env("PORT").or_else(|| env("SERVER_PORT")) {
                self.port = p
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got {p:?}"))?;
            } else {
                self.port = 8000;
            }
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // 若 TOML 中未提供，则尝试从环境变量填充
        fill_blank(&mut self.bucket, env, "AWS_S3_BUCKET_NAME");
        if let Some(region) = env("AWS_REGION").filter(|v| !v.trim().is_empty()) {
            if self.region == default_region() {
                self.region = region;
            }
        }
        fill_none(&mut self.access_key_id, env, "AWS_ACCESS_KEY_ID");
        fill_none(&mut self.secret_access_key, env, "AWS_SECRET_ACCESS_KEY");
        fill_none(&mut self.endpoint, env, "AWS_ENDPOINT_URL");
        fill_blank(&mut self.utilities_file_key, env, "UTILITIES_FILE_KEY");
        fill_blank(&mut self.submissions_file_key, env, "SUBSCRIBER_FILE_KEY");
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::S3 && self.bucket.trim().is_empty() {
            return Err(anyhow!("storage.bucket 为空；请在 config.toml 或环境变量 AWS_S3_BUCKET_NAME 中提供"));
        }
        if self.backend == StorageBackend::File && self.root_dir.trim().is_empty() {
            return Err(anyhow!("storage.root_dir must not be empty for the file backend"));
        }
        if self.utilities_file_key.trim().is_empty() {
            return Err(anyhow!("storage.utilities_file_key 为空；请设置 UTILITIES_FILE_KEY"));
        }
        if self.submissions_file_key.trim().is_empty() {
            return Err(anyhow!("storage.submissions_file_key 为空；请设置 SUBSCRIBER_FILE_KEY"));
        }
        Ok(())
    }

    /// Static credentials are only used when both halves are present.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (self.access_key_id.as_deref(), self.secret_access_key.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }
}

impl GeocodingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("geocoding.base_url must not be empty"));
        }
        if self.benchmark.trim().is_empty() {
            return Err(anyhow!("geocoding.benchmark must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("geocoding.timeout_secs 必须为正整数秒"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
