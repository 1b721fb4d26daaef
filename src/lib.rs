// ==========================================
// 染整批次登记系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 批次入厂/出厂登记（OPEN -> CLOSED 单向状态机）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 进程配置 + 工厂配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/迁移）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配 + HTTP 路由
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BatchStatus, ReceivedThroughType, TransportType};

// 领域实体
pub use domain::{
    Batch, BatchDetail, BatchItem, FacilityClock, RegistryEntry, RegistryKind,
    VehicleRegistration,
};

// API
pub use api::{ApiError, BatchApi, RegistryApi};

// 应用
pub use app::{router, AppState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "染整批次登记系统";
