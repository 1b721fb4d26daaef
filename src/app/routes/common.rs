use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::perf::PerfGuard;

// ==========================================
// 公共工具：错误映射、请求体/路径解析、阻塞调用
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误消息
    pub error: String,

    /// 错误代码
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "请求处理失败");
        }

        let body = ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// 解析 JSON 请求体；格式错误按校验错误处理
pub(super) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                "请求体解析失败: {}",
                rejection.body_text()
            );
            Err(ApiError::ValidationError(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

/// 解析路径中的批次 id
pub(super) fn parse_batch_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::ValidationError(format!("Invalid batch id: {}", raw)))
}

/// 在阻塞线程池中执行数据库调用，并记录性能日志
pub(super) async fn run_blocking<T, F>(op: &'static str, f: F) -> Result<Json<T>, ApiError>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let _perf = PerfGuard::new(op);
        f()
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("后台任务执行失败: {}", e)))?
    .map(Json)
}

/// 未匹配的路由
pub(super) async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
