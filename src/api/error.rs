// ==========================================
// 染整批次登记系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为对外错误
// 对外消息为英文（与既有前端约定一致）
// ==========================================

use crate::domain::registry::RegistryKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    /// 缺失/非法输入（400）
    #[error("{0}")]
    ValidationError(String),

    /// 记录不存在（404）
    #[error("{0}")]
    NotFound(String),

    /// 批次不存在或已出厂（404）
    #[error("Batch not found or already exited")]
    NotFoundOrAlreadyExited { batch_id: i64 },

    /// 字典名称重复（400）
    #[error("{kind} already exists")]
    DuplicateName { kind: RegistryKind, name: String },

    // ==========================================
    // 数据访问错误（500，对外不暴露细节）
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 稳定的错误代码（前端按代码匹配，不按消息匹配）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::NotFoundOrAlreadyExited { .. } => "NOT_FOUND_OR_ALREADY_EXITED",
            ApiError::DuplicateName { .. } => "DUPLICATE_NAME",
            ApiError::DatabaseError(_) => "STORAGE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError(_) | ApiError::DuplicateName { .. } => 400,
            ApiError::NotFound(_) | ApiError::NotFoundOrAlreadyExited { .. } => 404,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => 500,
        }
    }

    /// 是否为服务端错误（需记录日志、隐藏细节）
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::DatabaseError(_) | ApiError::InternalError(_))
    }

    /// 对外展示的消息
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found (id={})", entity, id))
            }
            RepositoryError::NotFoundOrAlreadyExited { id } => {
                ApiError::NotFoundOrAlreadyExited { batch_id: id }
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("Referenced record does not exist: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
