// ==========================================
// 染整批次登记系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 路由调用
// ==========================================

pub mod batch_api;
pub mod dto;
pub mod error;
pub mod registry_api;
pub mod validator;

// 重导出核心类型
pub use batch_api::BatchApi;
pub use dto::{
    BatchDetailItemView, BatchDetailView, BatchItemInput, BatchItemView, BatchRequest, BatchView,
    CreateBatchResponse, ExitBatchRequest, ExitBatchResponse, MessageResponse, NameRequest,
    RegistryEntryView,
};
pub use error::{ApiError, ApiResult};
pub use registry_api::RegistryApi;
pub use validator::{BatchRequestValidator, ValidatedBatch};
