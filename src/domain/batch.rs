// ==========================================
// 染整批次登记系统 - 批次领域模型
// ==========================================
// 批次 (Batch): 一次入厂的来料批
// 明细 (BatchItem): 批次内的一行物料（材质/颜色/卷数）
// ==========================================
// 生命周期: 创建(OPEN) -> 出厂(CLOSED)
// 约束: 仅 OPEN 状态允许修改/删除；出厂不可撤销
// ==========================================

use crate::domain::types::{BatchStatus, ReceivedThroughType, TransportType};
use crate::domain::vehicle::VehicleRegistration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 明细卷数缺省值
pub const DEFAULT_NUMBER_OF_ROLLS: i64 = 1;

// ==========================================
// Batch - 批次
// ==========================================
// 对齐: batches 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: i64,
    pub company_id: i64,
    pub in_time: DateTime<Utc>,          // 入厂时间（创建时采集，不可变）
    pub out_time: Option<DateTime<Utc>>, // 出厂时间（null 表示在厂）
    pub lot_number: String,
    pub received_through_type: ReceivedThroughType,
    pub mediator_id: Option<i64>,

    // ===== 出厂信息（出厂时一次性写入） =====
    pub destination_id: Option<i64>,
    pub exit_notes: Option<String>,
    pub transport_type: Option<TransportType>,
    pub vehicle_registration: Option<String>,
}

impl Batch {
    pub fn status(&self) -> BatchStatus {
        BatchStatus::from_out_time(self.out_time.as_ref())
    }

    pub fn is_open(&self) -> bool {
        self.status() == BatchStatus::Open
    }
}

/// 批次 + 关联名称（公司/中间人/去向）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch: Batch,
    pub company_name: Option<String>,
    pub mediator_name: Option<String>,
    pub destination_name: Option<String>,
}

// ==========================================
// BatchItem - 批次明细
// ==========================================
// 对齐: batch_items 表；随批次一同删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: i64,
    pub batch_id: i64,
    pub material_type_id: i64,
    pub color: String,
    pub number_of_rolls: i64,
}

/// 明细 + 材质名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemRecord {
    pub item: BatchItem,
    pub material_type_name: Option<String>,
}

/// 批次详情（含明细）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDetail {
    pub record: BatchRecord,
    pub items: Vec<BatchItemRecord>,
}

// ==========================================
// 写入参数（已通过校验）
// ==========================================

/// 批次可编辑字段（创建/修改共用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFields {
    pub company_id: i64,
    pub lot_number: String,
    pub received_through_type: ReceivedThroughType,
    pub mediator_id: Option<i64>,
}

/// 待写入的明细行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBatchItem {
    pub material_type_id: i64,
    pub color: String,
    pub number_of_rolls: i64,
}

/// 出厂字段
#[derive(Debug, Clone, PartialEq)]
pub struct ExitFields {
    pub out_time: DateTime<Utc>,
    pub destination_id: i64,
    pub exit_notes: Option<String>,
    pub transport_type: TransportType,
    pub vehicle_registration: Option<VehicleRegistration>,
}

/// 创建结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBatch {
    pub id: i64,
    pub in_time: DateTime<Utc>,
}
