// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::Arc;
use tempfile::NamedTempFile;

use dyeing_tracker::api::dto::BatchRequest;
use dyeing_tracker::api::{ApiError, BatchApi, RegistryApi};
use dyeing_tracker::app::AppState;
use dyeing_tracker::domain::registry::RegistryKind;
use dyeing_tracker::logging;
use dyeing_tracker::repository::BatchRepository;

use super::test_data_builder::BatchRequestBuilder;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 基于临时文件库装配完整 AppState，并预置一组基础资料
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: Arc<AppState>,
    pub batch_api: Arc<BatchApi>,
    pub registry_api: Arc<RegistryApi>,
    pub batch_repo: Arc<BatchRepository>,

    // 预置基础资料
    pub company_id: i64,
    pub mediator_id: i64,
    pub cotton_id: i64,
    pub polyester_id: i64,
    pub destination_id: i64,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的测试环境
    pub fn new() -> Result<Self, String> {
        // 初始化日志系统
        logging::init_test();

        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试库失败: {}", e))?;

        let state = Arc::new(AppState::new(db_path.clone())?);
        let registry_api = state.registry_api.clone();

        let ensure = |kind: RegistryKind, name: &str| {
            registry_api
                .ensure(kind, name)
                .map(|e| e.id)
                .map_err(|e| format!("预置{}失败: {}", kind, e))
        };

        let company_id = ensure(RegistryKind::Company, "Shree Textiles")?;
        let mediator_id = ensure(RegistryKind::Mediator, "Ramesh Agencies")?;
        let cotton_id = ensure(RegistryKind::MaterialType, "Cotton")?;
        let polyester_id = ensure(RegistryKind::MaterialType, "Polyester")?;
        let destination_id = ensure(RegistryKind::Destination, "Finishing Unit 2")?;

        Ok(Self {
            db_path,
            batch_api: state.batch_api.clone(),
            registry_api,
            batch_repo: state.batch_repo.clone(),
            state,
            company_id,
            mediator_id,
            cotton_id,
            polyester_id,
            destination_id,
            _temp_file: temp_file,
        })
    }

    /// 两行明细的标准批次请求
    pub fn standard_batch_request(&self, lot_number: &str) -> BatchRequest {
        BatchRequestBuilder::new(self.company_id, lot_number)
            .item(self.cotton_id, "Navy Blue", Some(12))
            .item(self.polyester_id, "Maroon", None)
            .build()
    }

    /// 创建标准批次并返回 id
    pub fn create_standard_batch(&self, lot_number: &str) -> i64 {
        self.batch_api
            .create_batch(&self.standard_batch_request(lot_number))
            .expect("创建批次失败")
            .batch_id
    }

    /// 打开一个独立连接用于核对数据
    pub fn open_connection(&self) -> rusqlite::Connection {
        test_helpers::open_test_connection(&self.db_path)
    }
}

// ==========================================
// 错误断言辅助函数
// ==========================================

/// 验证是否为校验错误，并返回错误消息
pub fn assert_validation_error(result: Result<impl std::fmt::Debug, ApiError>) -> String {
    match result {
        Err(ApiError::ValidationError(msg)) => msg,
        Ok(val) => panic!("预期ValidationError错误，但操作成功: {:?}", val),
        Err(e) => panic!("预期ValidationError错误，但得到: {:?}", e),
    }
}

/// 验证是否为"批次不存在或已出厂"
pub fn assert_not_found_or_exited(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::NotFoundOrAlreadyExited { .. }) => {
            // 预期的错误类型
        }
        Ok(val) => panic!("预期NotFoundOrAlreadyExited错误，但操作成功: {:?}", val),
        Err(e) => panic!("预期NotFoundOrAlreadyExited错误，但得到: {:?}", e),
    }
}

/// 验证是否为记录不存在
pub fn assert_not_found(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::NotFound(_)) => {
            // 预期的错误类型
        }
        Ok(val) => panic!("预期NotFound错误，但操作成功: {:?}", val),
        Err(e) => panic!("预期NotFound错误，但得到: {:?}", e),
    }
}

/// 验证是否为名称重复
pub fn assert_duplicate_name(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::DuplicateName { .. }) => {
            // 预期的错误类型
        }
        Ok(val) => panic!("预期DuplicateName错误，但操作成功: {:?}", val),
        Err(e) => panic!("预期DuplicateName错误，但得到: {:?}", e),
    }
}
