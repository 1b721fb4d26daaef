// ==========================================
// 染整批次登记系统 - 领域类型定义
// ==========================================
// 收货方式 / 运输方式 / 批次状态
// 序列化格式: 小写 (与数据库、前端一致)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 收货方式 (Received Through)
// ==========================================
// mediator 时必须携带 mediator_id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivedThroughType {
    Direct,   // 客户直送
    Mediator, // 经中间人
}

impl ReceivedThroughType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ReceivedThroughType::Direct => "direct",
            ReceivedThroughType::Mediator => "mediator",
        }
    }

    /// 解析外部输入（忽略大小写与首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Some(ReceivedThroughType::Direct),
            "mediator" => Some(ReceivedThroughType::Mediator),
            _ => None,
        }
    }

    pub fn requires_mediator(&self) -> bool {
        matches!(self, ReceivedThroughType::Mediator)
    }
}

impl fmt::Display for ReceivedThroughType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// ==========================================
// 运输方式 (Transport Type)
// ==========================================
// 仅出厂时填写; external 必须登记车牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Internal, // 厂内车辆
    External, // 外部车辆
}

impl TransportType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransportType::Internal => "internal",
            TransportType::External => "external",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Some(TransportType::Internal),
            "external" => Some(TransportType::External),
            _ => None,
        }
    }

    pub fn requires_vehicle_registration(&self) -> bool {
        matches!(self, TransportType::External)
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// ==========================================
// 批次状态 (Batch Status)
// ==========================================
// 唯一判据: out_time 是否为空
// OPEN -> CLOSED 单向，不可回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Open,   // 在厂
    Closed, // 已出厂
}

impl BatchStatus {
    pub fn from_out_time(out_time: Option<&DateTime<Utc>>) -> Self {
        match out_time {
            None => BatchStatus::Open,
            Some(_) => BatchStatus::Closed,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Open => write!(f, "OPEN"),
            BatchStatus::Closed => write!(f, "CLOSED"),
        }
    }
}
