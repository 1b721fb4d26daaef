// ==========================================
// 染整批次登记系统 - 批次流程 API
// ==========================================
// 职责: 批次创建、修改、出厂、删除及查询
// 状态机: OPEN --exit--> CLOSED（单向）
// 约束: 修改/删除仅限 OPEN；校验失败不触碰存储
// ==========================================

use std::sync::Arc;

use crate::api::dto::{
    BatchDetailView, BatchItemView, BatchRequest, BatchView, CreateBatchResponse,
    ExitBatchRequest, ExitBatchResponse, MessageResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::BatchRequestValidator;
use crate::domain::clock::FacilityClock;
use crate::repository::batch_repo::BatchRepository;

// ==========================================
// BatchApi - 批次流程 API
// ==========================================

/// 批次流程API
///
/// 职责：
/// 1. 请求校验（委托 BatchRequestValidator）
/// 2. 入厂/出厂时间采集（工厂时钟）
/// 3. 调用仓储完成原子写入
pub struct BatchApi {
    batch_repo: Arc<BatchRepository>,
    validator: Arc<BatchRequestValidator>,
    clock: FacilityClock,
}

impl BatchApi {
    /// 创建新的BatchApi实例
    pub fn new(
        batch_repo: Arc<BatchRepository>,
        validator: Arc<BatchRequestValidator>,
        clock: FacilityClock,
    ) -> Self {
        Self {
            batch_repo,
            validator,
            clock,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 全部批次，入厂时间倒序
    pub fn list_batches(&self) -> ApiResult<Vec<BatchView>> {
        let records = self.batch_repo.list_all()?;
        tracing::debug!(count = records.len(), "查询全部批次");
        Ok(records
            .into_iter()
            .map(|r| BatchView::from_record(r, &self.clock))
            .collect())
    }

    /// 在厂批次，入厂时间倒序
    pub fn list_open_batches(&self) -> ApiResult<Vec<BatchView>> {
        let records = self.batch_repo.list_open()?;
        tracing::debug!(count = records.len(), "查询在厂批次");
        Ok(records
            .into_iter()
            .map(|r| BatchView::from_record(r, &self.clock))
            .collect())
    }

    /// 批次详情（含明细）
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 批次不存在
    pub fn get_batch(&self, id: i64) -> ApiResult<BatchDetailView> {
        let detail = self.batch_repo.get_detail(id)?;
        Ok(BatchDetailView::from_detail(detail, &self.clock))
    }

    /// 批次明细
    pub fn list_batch_items(&self, batch_id: i64) -> ApiResult<Vec<BatchItemView>> {
        let items = self.batch_repo.list_items(batch_id)?;
        Ok(items.into_iter().map(BatchItemView::from).collect())
    }

    // ==========================================
    // 状态迁移
    // ==========================================

    /// 创建批次（入厂）
    ///
    /// # 返回
    /// - Ok(CreateBatchResponse): 新批次 id 与入厂时间
    /// - Err(ApiError::ValidationError): 缺失/非法字段，存储不变
    pub fn create_batch(&self, req: &BatchRequest) -> ApiResult<CreateBatchResponse> {
        let validated = self.validator.validate_batch(req)?;
        let in_time = self.clock.now();

        let created = self
            .batch_repo
            .create_batch(&validated.fields, in_time, &validated.items)?;

        tracing::info!(
            batch_id = created.id,
            company_id = validated.fields.company_id,
            lot_number = %validated.fields.lot_number,
            items = validated.items.len(),
            "批次入厂登记完成"
        );

        Ok(CreateBatchResponse {
            message: "Batch created successfully".to_string(),
            batch_id: created.id,
            in_time: self.clock.to_local(&created.in_time),
        })
    }

    /// 出厂登记
    ///
    /// # 返回
    /// - Err(ApiError::ValidationError): 去向/运输方式缺失，或车牌不合法
    /// - Err(ApiError::NotFoundOrAlreadyExited): 批次不存在或已出厂
    pub fn exit_batch(&self, id: i64, req: &ExitBatchRequest) -> ApiResult<ExitBatchResponse> {
        let exit = self.validator.validate_exit(req, self.clock.now())?;

        if let Err(e) = self.batch_repo.exit_batch(id, &exit) {
            let err = ApiError::from(e);
            if let ApiError::NotFoundOrAlreadyExited { .. } = err {
                tracing::warn!(batch_id = id, "出厂被拒绝: 批次不存在或已出厂");
            }
            return Err(err);
        }

        tracing::info!(
            batch_id = id,
            destination_id = exit.destination_id,
            transport_type = %exit.transport_type,
            "批次出厂完成"
        );

        Ok(ExitBatchResponse {
            message: "Batch exited successfully".to_string(),
            out_time: self.clock.to_local(&exit.out_time),
            destination_id: exit.destination_id,
            transport_type: exit.transport_type,
            vehicle_registration: exit.vehicle_registration.map(|v| v.into_inner()),
        })
    }

    /// 修改在厂批次（字段 + 全量替换明细）
    ///
    /// 先确认批次在厂，再做字段校验。
    pub fn update_batch(&self, id: i64, req: &BatchRequest) -> ApiResult<MessageResponse> {
        self.ensure_open(id)?;
        let validated = self.validator.validate_batch(req)?;

        self.batch_repo
            .update_batch(id, &validated.fields, &validated.items)?;

        tracing::info!(batch_id = id, items = validated.items.len(), "批次修改完成");
        Ok(MessageResponse::new("Batch updated successfully"))
    }

    /// 删除在厂批次（明细随之删除）
    pub fn delete_batch(&self, id: i64) -> ApiResult<MessageResponse> {
        self.ensure_open(id)?;
        self.batch_repo.delete_batch(id)?;

        tracing::info!(batch_id = id, "批次删除完成");
        Ok(MessageResponse::new("Batch deleted successfully"))
    }

    fn ensure_open(&self, id: i64) -> ApiResult<()> {
        if self.batch_repo.is_open(id)? {
            return Ok(());
        }
        tracing::warn!(batch_id = id, "操作被拒绝: 批次不存在或已出厂");
        Err(ApiError::NotFoundOrAlreadyExited { batch_id: id })
    }
}
