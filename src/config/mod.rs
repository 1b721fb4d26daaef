// ==========================================
// 染整批次登记系统 - 配置层
// ==========================================
// 职责: 进程配置（环境变量）+ 工厂配置（config_kv 表）
// ==========================================

pub mod config_manager;
pub mod server_config;

// 重导出
pub use config_manager::{config_keys, ConfigManager};
pub use server_config::{get_default_db_path, ConfigError, ServerConfig};
