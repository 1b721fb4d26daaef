// ==========================================
// 染整批次登记系统 - 应用层
// ==========================================
// 职责: 应用状态装配 + HTTP 路由
// ==========================================

pub mod routes;
pub mod state;

// 重导出
pub use routes::router;
pub use state::AppState;
