// ==========================================
// 染整批次登记系统 - 配置管理器
// ==========================================
// 职责: 工厂级配置读取、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::clock::{FacilityClock, DEFAULT_TIMEZONE_NAME, DEFAULT_UTC_OFFSET_MINUTES};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    /// 工厂时区偏移（分钟），默认 330
    pub const FACILITY_UTC_OFFSET_MINUTES: &str = "facility.utc_offset_minutes";
    /// 工厂时区名称（仅展示）
    pub const FACILITY_TIMEZONE_NAME: &str = "facility.timezone_name";
}

/// 配置作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 工厂时区偏移（分钟）；配置值非法时回退默认值
    pub fn facility_utc_offset_minutes(&self) -> Result<i32, Box<dyn Error>> {
        let raw = self.get_config_or_default(
            config_keys::FACILITY_UTC_OFFSET_MINUTES,
            &DEFAULT_UTC_OFFSET_MINUTES.to_string(),
        )?;
        match raw.trim().parse::<i32>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    key = config_keys::FACILITY_UTC_OFFSET_MINUTES,
                    value = %raw,
                    "时区偏移配置非法，使用默认值"
                );
                Ok(DEFAULT_UTC_OFFSET_MINUTES)
            }
        }
    }

    /// 工厂时区名称
    pub fn facility_timezone_name(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::FACILITY_TIMEZONE_NAME, DEFAULT_TIMEZONE_NAME)
    }

    /// 构建工厂时钟
    pub fn facility_clock(&self) -> Result<FacilityClock, Box<dyn Error>> {
        let offset = self.facility_utc_offset_minutes()?;
        let name = self.facility_timezone_name()?;
        match FacilityClock::new(offset, name) {
            Some(clock) => Ok(clock),
            None => {
                tracing::warn!(offset, "时区偏移超出范围，使用默认时钟");
                Ok(FacilityClock::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn manager() -> ConfigManager {
        ConfigManager::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_defaults_without_rows() {
        let cm = manager();
        assert_eq!(cm.facility_utc_offset_minutes().unwrap(), 330);
        assert_eq!(cm.facility_timezone_name().unwrap(), "Asia/Kolkata");
        assert_eq!(cm.get_global_config_value("missing").unwrap(), None);
    }

    #[test]
    fn test_set_overrides_value() {
        let cm = manager();
        cm.set_global_config_value(config_keys::FACILITY_UTC_OFFSET_MINUTES, "345")
            .unwrap();
        cm.set_global_config_value(config_keys::FACILITY_TIMEZONE_NAME, "Asia/Kathmandu")
            .unwrap();

        let clock = cm.facility_clock().unwrap();
        assert_eq!(clock.offset().local_minus_utc(), 345 * 60);
        assert_eq!(clock.timezone_name(), "Asia/Kathmandu");
    }

    #[test]
    fn test_invalid_offset_falls_back() {
        let cm = manager();
        cm.set_global_config_value(config_keys::FACILITY_UTC_OFFSET_MINUTES, "half past five")
            .unwrap();
        assert_eq!(cm.facility_utc_offset_minutes().unwrap(), 330);

        cm.set_global_config_value(config_keys::FACILITY_UTC_OFFSET_MINUTES, "99999")
            .unwrap();
        let clock = cm.facility_clock().unwrap();
        assert_eq!(clock.offset().local_minus_utc(), 330 * 60);
    }
}
