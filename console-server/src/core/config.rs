use std::fmt;

use shared::error::AppError;

/// 文档存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// 进程内存储 (开发环境, 带演示数据)
    Memory,
    /// REST 文档库 + 对象存储
    Http,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "http" => Some(Self::Http),
            _ => None,
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Http => write!(f, "http"),
        }
    }
}

/// 服务器配置 - 控制台后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 日志文件目录 (按天滚动) |
/// | STORE_BACKEND | memory | memory / http |
/// | DOCUMENT_STORE_URL | http://localhost:8090 | 文档库地址 |
/// | BLOB_STORE_URL | http://localhost:8091 | 对象存储地址 |
/// | STORE_TOKEN | - | 存储访问令牌 |
/// | DEEPL_API_KEY | - | DeepL 密钥 (未设置则翻译不可用) |
/// | DEEPL_API_URL | https://api-free.deepl.com/v2/translate | DeepL 接口 |
/// | TRANSLATION_BATCH_SIZE | 50 | 单次翻译条数上限 |
/// | TRANSLATION_BATCH_DELAY_MS | 100 | 批次间隔(毫秒) |
/// | REFRESH_INTERVAL_SECS | 15 | 快照定时刷新间隔(秒) |
/// | SESSION_IDLE_SECS | 1800 | 无未提交修改的会话闲置多久后回收(秒) |
/// | REQUEST_TIMEOUT_MS | 30000 | 外部请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// STORE_BACKEND=http DOCUMENT_STORE_URL=http://db:8090 cargo run -p console-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,

    // === 外部协作方 ===
    pub store_backend: StoreBackend,
    pub document_store_url: String,
    pub blob_store_url: String,
    pub store_token: Option<String>,
    pub deepl_api_key: Option<String>,
    pub deepl_api_url: String,

    // === 翻译 ===
    /// 单次调用的最大文本数
    pub translation_batch_size: usize,
    /// 批次之间的等待时间 (毫秒)
    pub translation_batch_delay_ms: u64,

    /// 快照定时刷新间隔 (秒)
    pub refresh_interval_secs: u64,
    /// 会话闲置回收阈值 (秒)
    pub session_idle_secs: u64,
    /// 外部请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置 (测试用)
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: var("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: non_empty("LOG_DIR"),

            store_backend: var("STORE_BACKEND")
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(StoreBackend::Memory),
            document_store_url: var("DOCUMENT_STORE_URL")
                .unwrap_or_else(|| "http://localhost:8090".into()),
            blob_store_url: var("BLOB_STORE_URL").unwrap_or_else(|| "http://localhost:8091".into()),
            store_token: non_empty("STORE_TOKEN"),
            deepl_api_key: non_empty("DEEPL_API_KEY"),
            deepl_api_url: var("DEEPL_API_URL")
                .unwrap_or_else(|| mixo_client::deepl::DEFAULT_API_URL.into()),

            translation_batch_size: var("TRANSLATION_BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            translation_batch_delay_ms: var("TRANSLATION_BATCH_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),

            refresh_interval_secs: var("REFRESH_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            session_idle_secs: var("SESSION_IDLE_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            request_timeout_ms: var("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// 校验配置组合
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.is_development() && self.store_backend == StoreBackend::Memory {
            return Err(AppError::config(format!(
                "STORE_BACKEND=memory is only allowed in development (environment: {})",
                self.environment
            )));
        }
        if self.translation_batch_size == 0 {
            return Err(AppError::config("TRANSLATION_BATCH_SIZE must be at least 1"));
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.http_port, 3000);
        assert!(c.is_development());
        assert_eq!(c.store_backend, StoreBackend::Memory);
        assert_eq!(c.translation_batch_size, 50);
        assert_eq!(c.translation_batch_delay_ms, 100);
        assert_eq!(c.refresh_interval_secs, 15);
        assert_eq!(c.session_idle_secs, 1800);
        assert!(c.deepl_api_key.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("HTTP_PORT", "8080"),
            ("STORE_BACKEND", "HTTP"),
            ("DEEPL_API_KEY", "abc:fx"),
            ("TRANSLATION_BATCH_SIZE", "10"),
            ("LOG_JSON", "true"),
            ("LOG_DIR", ""),
            ("SESSION_IDLE_SECS", "60"),
        ]);
        assert_eq!(c.http_port, 8080);
        assert_eq!(c.store_backend, StoreBackend::Http);
        assert_eq!(c.deepl_api_key.as_deref(), Some("abc:fx"));
        assert_eq!(c.translation_batch_size, 10);
        assert!(c.log_json);
        assert!(c.log_dir.is_none());
        assert_eq!(c.session_idle_secs, 60);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let c = config(&[("HTTP_PORT", "eighty"), ("STORE_BACKEND", "sqlite")]);
        assert_eq!(c.http_port, 3000);
        assert_eq!(c.store_backend, StoreBackend::Memory);
    }

    #[test]
    fn test_production_rejects_memory_backend() {
        let c = config(&[("ENVIRONMENT", "production")]);
        assert!(c.is_production());
        let err = c.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let c = config(&[("ENVIRONMENT", "production"), ("STORE_BACKEND", "http")]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let c = config(&[("TRANSLATION_BATCH_SIZE", "0")]);
        assert!(c.validate().is_err());
    }
}
