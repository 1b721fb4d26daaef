// ==========================================
// 染整批次登记系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值对象、状态类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod batch;
pub mod clock;
pub mod registry;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use batch::{
    Batch, BatchDetail, BatchFields, BatchItem, BatchItemRecord, BatchRecord, CreatedBatch,
    ExitFields, NewBatchItem, DEFAULT_NUMBER_OF_ROLLS,
};
pub use clock::FacilityClock;
pub use registry::{normalize_name, RegistryEntry, RegistryKind};
pub use types::{BatchStatus, ReceivedThroughType, TransportType};
pub use vehicle::{VehicleRegistration, VehicleRegistrationError};
