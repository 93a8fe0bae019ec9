use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 位于反向代理之后时从 Forwarded / X-Forwarded-For 读取客户端 IP
    #[serde(default)]
    pub trust_proxy: bool,
    /// 允许跨域的前端地址，为空表示不限制
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Database,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(StorageBackend::Database),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_session_expires_in")]
    pub session_expires_in: i64, // seconds
    #[serde(default)]
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// 未设置时不自动创建管理员
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub defaults: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { defaults: true }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_session_expires_in() -> i64 {
    86_400
}

fn parse_origins(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env()?,
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("Failed to parse config file: {e}").into())
    }

    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        let backend = get_env("STORAGE_BACKEND")
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or_default();

        // 数据库后端在无配置文件时必须提供 DATABASE_URL
        let url = match (get_env("DATABASE_URL"), backend) {
            (Some(url), _) => url,
            (None, StorageBackend::Memory) => String::new(),
            (None, StorageBackend::Database) => {
                return Err(
                    "DATABASE_URL is not set and no config.toml was found".into(),
                );
            }
        };

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
                trust_proxy: get_env("SERVER_TRUST_PROXY")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(false),
                allowed_origins: get_env("CORS_ALLOWED_ORIGINS")
                    .map(|v| parse_origins(&v))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", default_max_connections()),
                backend,
            },
            auth: AuthConfig {
                jwt_secret: get_env("JWT_SECRET")
                    .unwrap_or_else(|| "change-me-in-production".to_string()),
                session_expires_in: get_env_parse(
                    "SESSION_EXPIRES_IN",
                    default_session_expires_in(),
                ),
                cookie_secure: get_env("COOKIE_SECURE")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(false),
            },
            admin: AdminConfig::default(),
            seed: SeedConfig::default(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("SERVER_TRUST_PROXY")
            && let Some(b) = parse_bool(&v)
        {
            self.server.trust_proxy = b;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_origins(&v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("STORAGE_BACKEND")
            && let Ok(backend) = v.parse()
        {
            self.database.backend = backend;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.auth.session_expires_in = n;
        }
        if let Ok(v) = env::var("COOKIE_SECURE")
            && let Some(b) = parse_bool(&v)
        {
            self.auth.cookie_secure = b;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = Some(v);
        }
        if let Ok(v) = env::var("SEED_DEFAULTS")
            && let Some(b) = parse_bool(&v)
        {
            self.seed.defaults = b;
        }
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.database.backend == StorageBackend::Database && self.database.url.is_empty() {
            return Err("database.url must be set for the database backend".into());
        }
        if self.auth.session_expires_in <= 0 {
            return Err("auth.session_expires_in must be positive".into());
        }
        if self.admin.username.trim().is_empty() {
            return Err("admin.username must not be empty".into());
        }
        Ok(())
    }
}
