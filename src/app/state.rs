// ==========================================
// 染整批次登记系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约束: 全进程共享一个 SQLite 连接（Arc<Mutex<Connection>>）
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{BatchApi, BatchRequestValidator, RegistryApi};
use crate::config::ConfigManager;
use crate::db;
use crate::domain::clock::FacilityClock;
use crate::domain::registry::RegistryKind;
use crate::perf::{install_sqlite_tracing, PerfSettings};
use crate::repository::{BatchRepository, RegistryRepository};

/// 内存库的占位路径
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// 应用状态
///
/// 由 main 显式构造后交给路由层；测试中可用 `in_memory()` 获得隔离实例。
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 工厂时钟（入厂/出厂时间采集、对外时间展示）
    pub clock: FacilityClock,

    /// 批次流程API
    pub batch_api: Arc<BatchApi>,

    /// 基础资料API
    pub registry_api: Arc<RegistryApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 批次仓储（测试、诊断用）
    pub batch_repo: Arc<BatchRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 成功创建
    /// - Err(String): 创建失败
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库连接: {}", e))?;
        install_sqlite_tracing(&mut conn, PerfSettings::from_env());

        Self::from_connection(db_path, conn)
    }

    /// 基于内存库创建（测试用）
    pub fn in_memory() -> Result<Self, String> {
        let conn = db::open_in_memory().map_err(|e| format!("无法打开内存数据库: {}", e))?;
        Self::from_connection(IN_MEMORY_DB_PATH.to_string(), conn)
    }

    fn from_connection(db_path: String, mut conn: Connection) -> Result<Self, String> {
        db::initialize(&mut conn).map_err(|e| format!("数据库初始化失败: {}", e))?;

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let registry = |kind| Arc::new(RegistryRepository::new(conn.clone(), kind));
        let company_repo = registry(RegistryKind::Company);
        let mediator_repo = registry(RegistryKind::Mediator);
        let material_type_repo = registry(RegistryKind::MaterialType);
        let destination_repo = registry(RegistryKind::Destination);
        let batch_repo = Arc::new(BatchRepository::new(conn.clone()));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let clock = config_manager
            .facility_clock()
            .map_err(|e| format!("无法读取工厂时区配置: {}", e))?;
        tracing::info!(
            timezone = clock.timezone_name(),
            offset = %clock.offset(),
            "工厂时钟已就绪"
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let validator = Arc::new(BatchRequestValidator::new(
            company_repo.clone(),
            mediator_repo.clone(),
            material_type_repo.clone(),
            destination_repo.clone(),
        ));

        let batch_api = Arc::new(BatchApi::new(
            batch_repo.clone(),
            validator,
            clock.clone(),
        ));

        let registry_api = Arc::new(RegistryApi::new(
            company_repo,
            mediator_repo,
            material_type_repo,
            destination_repo,
            clock.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            clock,
            batch_api,
            registry_api,
            config_manager,
            batch_repo,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}
