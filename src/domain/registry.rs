// ==========================================
// 染整批次登记系统 - 基础资料（字典）模型
// ==========================================
// 公司 / 中间人 / 材质 / 去向
// 约束: 名称去除首尾空白后唯一（区分大小写）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 字典种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Company,
    Mediator,
    MaterialType,
    Destination,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 4] = [
        RegistryKind::Company,
        RegistryKind::Mediator,
        RegistryKind::MaterialType,
        RegistryKind::Destination,
    ];

    /// 对应数据表
    pub fn table(&self) -> &'static str {
        match self {
            RegistryKind::Company => "companies",
            RegistryKind::Mediator => "mediators",
            RegistryKind::MaterialType => "material_types",
            RegistryKind::Destination => "destinations",
        }
    }

    /// 对外展示名称（错误消息使用）
    pub fn label(&self) -> &'static str {
        match self {
            RegistryKind::Company => "Company",
            RegistryKind::Mediator => "Mediator",
            RegistryKind::MaterialType => "Material type",
            RegistryKind::Destination => "Destination",
        }
    }

    /// 去向表额外记录创建时间
    pub fn has_created_at(&self) -> bool {
        matches!(self, RegistryKind::Destination)
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 字典条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 规范化字典名称：去除首尾空白，空串视为缺失
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
