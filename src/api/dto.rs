// ==========================================
// 染整批次登记系统 - API 请求/响应结构
// ==========================================
// 请求: 字段全部可选，由 validator 统一给出缺失提示
// 响应: 时间统一转换为工厂本地时间（RFC 3339，带偏移）
// ==========================================

use crate::domain::batch::{BatchDetail, BatchItemRecord, BatchRecord};
use crate::domain::clock::FacilityClock;
use crate::domain::registry::RegistryEntry;
use crate::domain::types::{BatchStatus, ReceivedThroughType, TransportType};
use chrono::{DateTime, FixedOffset};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ==========================================
// 宽松数值解析
// ==========================================

/// 宽松整数解析：接受数字或数字字符串
///
/// 表单提交常把 id 作为字符串发送（"3" 而非 3）；null 与空串视为缺失。
pub fn de_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid integer: {}", n))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("cannot parse '{}' as integer", s)))
        }
        Some(other) => Err(de::Error::custom(format!(
            "expected number or string, got {}",
            other
        ))),
    }
}

// ==========================================
// 请求
// ==========================================

/// 字典新增请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: Option<String>,
}

/// 明细行输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchItemInput {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub material_type_id: Option<i64>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub number_of_rolls: Option<i64>,
}

/// 批次创建/修改请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub company_id: Option<i64>,
    pub lot_number: Option<String>,
    pub items: Option<Vec<BatchItemInput>>,
    pub received_through_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub mediator_id: Option<i64>,
}

/// 出厂请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExitBatchRequest {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub destination_id: Option<i64>,
    pub notes: Option<String>,
    pub transport_type: Option<String>,
    pub vehicle_registration: Option<String>,
}

// ==========================================
// 响应
// ==========================================

/// 通用消息响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 创建批次响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBatchResponse {
    pub message: String,
    #[serde(rename = "batchId")]
    pub batch_id: i64,
    pub in_time: DateTime<FixedOffset>,
}

/// 出厂响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitBatchResponse {
    pub message: String,
    pub out_time: DateTime<FixedOffset>,
    pub destination_id: i64,
    pub transport_type: TransportType,
    pub vehicle_registration: Option<String>,
}

/// 字典条目视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntryView {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl RegistryEntryView {
    pub fn from_entry(entry: RegistryEntry, clock: &FacilityClock) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            created_at: entry.created_at.as_ref().map(|t| clock.to_local(t)),
        }
    }
}

/// 批次视图（批次列 + 关联名称）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchView {
    pub id: i64,
    pub company_id: i64,
    pub in_time: DateTime<FixedOffset>,
    pub out_time: Option<DateTime<FixedOffset>>,
    pub lot_number: String,
    pub received_through_type: ReceivedThroughType,
    pub mediator_id: Option<i64>,
    pub destination_id: Option<i64>,
    pub exit_notes: Option<String>,
    pub transport_type: Option<TransportType>,
    pub vehicle_registration: Option<String>,
    pub company_name: Option<String>,
    pub mediator_name: Option<String>,
    pub destination_name: Option<String>,
    pub status: BatchStatus,
}

impl BatchView {
    pub fn from_record(record: BatchRecord, clock: &FacilityClock) -> Self {
        let status = record.batch.status();
        let batch = record.batch;
        Self {
            id: batch.id,
            company_id: batch.company_id,
            in_time: clock.to_local(&batch.in_time),
            out_time: batch.out_time.as_ref().map(|t| clock.to_local(t)),
            lot_number: batch.lot_number,
            received_through_type: batch.received_through_type,
            mediator_id: batch.mediator_id,
            destination_id: batch.destination_id,
            exit_notes: batch.exit_notes,
            transport_type: batch.transport_type,
            vehicle_registration: batch.vehicle_registration,
            company_name: record.company_name,
            mediator_name: record.mediator_name,
            destination_name: record.destination_name,
            status,
        }
    }
}

/// 明细视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemView {
    pub id: i64,
    pub batch_id: i64,
    pub material_type_id: i64,
    pub color: String,
    pub number_of_rolls: i64,
    pub material_type_name: Option<String>,
}

impl From<BatchItemRecord> for BatchItemView {
    fn from(record: BatchItemRecord) -> Self {
        Self {
            id: record.item.id,
            batch_id: record.item.batch_id,
            material_type_id: record.item.material_type_id,
            color: record.item.color,
            number_of_rolls: record.item.number_of_rolls,
            material_type_name: record.material_type_name,
        }
    }
}

/// 详情内的明细视图
///
/// 编辑页按 material_name 读取材质名称，这里同时保留 material_type_name。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDetailItemView {
    #[serde(flatten)]
    pub item: BatchItemView,
    pub material_name: Option<String>,
}

impl From<BatchItemRecord> for BatchDetailItemView {
    fn from(record: BatchItemRecord) -> Self {
        let material_name = record.material_type_name.clone();
        Self {
            item: BatchItemView::from(record),
            material_name,
        }
    }
}

/// 批次详情视图（批次字段平铺 + items）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDetailView {
    #[serde(flatten)]
    pub batch: BatchView,
    pub items: Vec<BatchDetailItemView>,
}

impl BatchDetailView {
    pub fn from_detail(detail: BatchDetail, clock: &FacilityClock) -> Self {
        Self {
            batch: BatchView::from_record(detail.record, clock),
            items: detail.items.into_iter().map(BatchDetailItemView::from).collect(),
        }
    }
}
