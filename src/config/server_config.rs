// ==========================================
// 染整批次登记系统 - 进程配置
// ==========================================
// 来源: 环境变量
// - DYEING_TRACKER_DB_PATH: 数据库文件路径
// - DYEING_TRACKER_BIND: 监听地址（默认 0.0.0.0:4000）
// - LOG_FORMAT: text | json
// ==========================================

use crate::logging::LogFormat;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "DYEING_TRACKER_DB_PATH";
pub const ENV_BIND: &str = "DYEING_TRACKER_BIND";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

pub const DEFAULT_BIND: &str = "0.0.0.0:4000";
pub const DEFAULT_DB_FILE: &str = "dyeing.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("监听地址非法 ({var}={value}): {source}")]
    InvalidBindAddress {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// 进程级配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// 从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = non_empty(ENV_DB_PATH).unwrap_or_else(get_default_db_path);

        let bind_raw = non_empty(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddress {
                var: ENV_BIND,
                value: bind_raw.clone(),
                source,
            })?;

        let log_format = non_empty(ENV_LOG_FORMAT)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            db_path,
            bind_addr,
            log_format,
        })
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 开发环境: 用户数据目录/dyeing-tracker-dev/dyeing.db
/// - 生产环境: 用户数据目录/dyeing-tracker/dyeing.db
/// - 无法获取用户数据目录时: ./dyeing.db
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DEFAULT_DB_FILE));

    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = if cfg!(debug_assertions) {
            data_dir.join("dyeing-tracker-dev")
        } else {
            data_dir.join("dyeing-tracker")
        };

        // 目录创建失败时退回当前目录
        match std::fs::create_dir_all(&app_dir) {
            Ok(()) => path = app_dir.join(DEFAULT_DB_FILE),
            Err(e) => tracing::warn!("无法创建数据目录 {}: {}", app_dir.display(), e),
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /tmp/dyeing-test.db "),
            (ENV_BIND, "127.0.0.1:8080"),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap();

        assert_eq!(cfg.db_path, "/tmp/dyeing-test.db");
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn test_default_bind_and_format() {
        let cfg = ServerConfig::from_lookup(lookup(&[(ENV_DB_PATH, "x.db")])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 4000);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn test_invalid_bind_is_error() {
        let err = ServerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "x.db"),
            (ENV_BIND, "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddress { .. }));
    }
}
