// ==========================================
// 染整批次登记系统 - HTTP 路由
// ==========================================
// 职责: 将 HTTP 请求映射到 API 层
// 约束: SQLite 调用在 spawn_blocking 中执行
// ==========================================

mod batch;
mod common;
mod registry;

use std::sync::Arc;

use axum::Router;

use crate::app::state::AppState;

/// 构建完整路由表
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(registry::routes())
        .merge(batch::routes())
        .fallback(common::route_not_found)
        .with_state(state)
}
