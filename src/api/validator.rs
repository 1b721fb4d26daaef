// ==========================================
// 染整批次登记系统 - 批次请求校验器
// ==========================================
// 职责: 所有校验在写入前完成，失败时不触碰存储
// 1. 必填字段 / 枚举取值
// 2. 中间人收货必须指定中间人
// 3. 外部车辆出厂必须登记合法车牌
// 4. 引用的基础资料必须存在
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::dto::{BatchItemInput, BatchRequest, ExitBatchRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::batch::{BatchFields, ExitFields, NewBatchItem, DEFAULT_NUMBER_OF_ROLLS};
use crate::domain::registry::RegistryKind;
use crate::domain::types::{ReceivedThroughType, TransportType};
use crate::domain::vehicle::VehicleRegistration;
use crate::repository::registry_repo::RegistryRepository;

/// 校验通过的批次写入参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub fields: BatchFields,
    pub items: Vec<NewBatchItem>,
}

// ==========================================
// 纯格式校验（不访问存储）
// ==========================================

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn positive_id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id > 0)
}

/// 批次请求格式校验
///
/// - 缺失字段一次性列出
/// - 收货方式为 direct 时忽略 mediator_id（按 NULL 存储）
pub fn check_batch_request(req: &BatchRequest) -> ApiResult<ValidatedBatch> {
    let company_id = positive_id(req.company_id);
    let lot_number = non_blank(req.lot_number.as_deref());
    let items = req.items.as_deref().filter(|items| !items.is_empty());
    let received = non_blank(req.received_through_type.as_deref());

    let mut missing = Vec::new();
    if company_id.is_none() {
        missing.push("company_id");
    }
    if lot_number.is_none() {
        missing.push("lot_number");
    }
    if items.is_none() {
        missing.push("items");
    }
    if received.is_none() {
        missing.push("received_through_type");
    }

    let (Some(company_id), Some(lot_number), Some(items), Some(received)) =
        (company_id, lot_number, items, received)
    else {
        return Err(ApiError::ValidationError(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    let received_through_type = ReceivedThroughType::parse(&received).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "Invalid received_through_type '{}': expected 'direct' or 'mediator'",
            received
        ))
    })?;

    let mediator_id = if received_through_type.requires_mediator() {
        Some(positive_id(req.mediator_id).ok_or_else(|| {
            ApiError::ValidationError(
                "Mediator is required when received through mediator".to_string(),
            )
        })?)
    } else {
        None
    };

    let items = items
        .iter()
        .enumerate()
        .map(|(idx, item)| check_item(idx, item))
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(ValidatedBatch {
        fields: BatchFields {
            company_id,
            lot_number,
            received_through_type,
            mediator_id,
        },
        items,
    })
}

fn check_item(idx: usize, item: &BatchItemInput) -> ApiResult<NewBatchItem> {
    let material_type_id = positive_id(item.material_type_id).ok_or_else(|| {
        ApiError::ValidationError(format!("items[{}]: material_type_id is required", idx))
    })?;
    let color = non_blank(item.color.as_deref())
        .ok_or_else(|| ApiError::ValidationError(format!("items[{}]: color is required", idx)))?;
    let number_of_rolls = item.number_of_rolls.unwrap_or(DEFAULT_NUMBER_OF_ROLLS);
    if number_of_rolls < 1 {
        return Err(ApiError::ValidationError(format!(
            "items[{}]: number_of_rolls must be a positive integer",
            idx
        )));
    }

    Ok(NewBatchItem {
        material_type_id,
        color,
        number_of_rolls,
    })
}

/// 出厂请求格式校验
///
/// - external: 车牌必填，去空白后校验格式并转大写
/// - 其他运输方式: 车牌强制置空
pub fn check_exit_request(
    req: &ExitBatchRequest,
    out_time: DateTime<Utc>,
) -> ApiResult<ExitFields> {
    let destination_id = positive_id(req.destination_id)
        .ok_or_else(|| ApiError::ValidationError("Destination is required".to_string()))?;

    let transport_raw = non_blank(req.transport_type.as_deref())
        .ok_or_else(|| ApiError::ValidationError("Transport type is required".to_string()))?;
    let transport_type = TransportType::parse(&transport_raw).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "Invalid transport_type '{}': expected 'internal' or 'external'",
            transport_raw
        ))
    })?;

    let vehicle_registration = if transport_type.requires_vehicle_registration() {
        let raw = req.vehicle_registration.as_deref().unwrap_or_default();
        Some(VehicleRegistration::parse(raw).map_err(|e| ApiError::ValidationError(e.to_string()))?)
    } else {
        None
    };

    Ok(ExitFields {
        out_time,
        destination_id,
        exit_notes: non_blank(req.notes.as_deref()),
        transport_type,
        vehicle_registration,
    })
}

// ==========================================
// BatchRequestValidator - 含引用校验
// ==========================================

/// 批次请求校验器
///
/// 在格式校验之上确认公司、中间人、材质、去向均已登记。
pub struct BatchRequestValidator {
    company_repo: Arc<RegistryRepository>,
    mediator_repo: Arc<RegistryRepository>,
    material_type_repo: Arc<RegistryRepository>,
    destination_repo: Arc<RegistryRepository>,
}

impl BatchRequestValidator {
    pub fn new(
        company_repo: Arc<RegistryRepository>,
        mediator_repo: Arc<RegistryRepository>,
        material_type_repo: Arc<RegistryRepository>,
        destination_repo: Arc<RegistryRepository>,
    ) -> Self {
        Self {
            company_repo,
            mediator_repo,
            material_type_repo,
            destination_repo,
        }
    }

    /// 校验创建/修改请求
    pub fn validate_batch(&self, req: &BatchRequest) -> ApiResult<ValidatedBatch> {
        let validated = check_batch_request(req)?;

        self.ensure_exists(&self.company_repo, "company_id", validated.fields.company_id)?;
        if let Some(mediator_id) = validated.fields.mediator_id {
            self.ensure_exists(&self.mediator_repo, "mediator_id", mediator_id)?;
        }

        let mut seen = Vec::with_capacity(validated.items.len());
        for item in &validated.items {
            if seen.contains(&item.material_type_id) {
                continue;
            }
            self.ensure_exists(
                &self.material_type_repo,
                "material_type_id",
                item.material_type_id,
            )?;
            seen.push(item.material_type_id);
        }

        Ok(validated)
    }

    /// 校验出厂请求
    pub fn validate_exit(
        &self,
        req: &ExitBatchRequest,
        out_time: DateTime<Utc>,
    ) -> ApiResult<ExitFields> {
        let exit = check_exit_request(req, out_time)?;
        self.ensure_exists(&self.destination_repo, "destination_id", exit.destination_id)?;
        Ok(exit)
    }

    fn ensure_exists(&self, repo: &RegistryRepository, field: &str, id: i64) -> ApiResult<()> {
        if repo.exists(id)? {
            return Ok(());
        }
        Err(ApiError::ValidationError(format!(
            "{} {} does not reference an existing {}",
            field,
            id,
            registry_noun(repo.kind())
        )))
    }
}

fn registry_noun(kind: RegistryKind) -> &'static str {
    match kind {
        RegistryKind::Company => "company",
        RegistryKind::Mediator => "mediator",
        RegistryKind::MaterialType => "material type",
        RegistryKind::Destination => "destination",
    }
}
