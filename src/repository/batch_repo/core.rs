use crate::domain::batch::{Batch, BatchItem, BatchItemRecord, BatchRecord};
use crate::domain::types::{ReceivedThroughType, TransportType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// BatchRepository - 批次仓储
// ==========================================
pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 批次 + 关联名称的查询列（与 map_record 列序对齐）
pub(super) const BATCH_RECORD_SELECT: &str = r#"
    SELECT
        b.id, b.company_id, b.in_time, b.out_time, b.lot_number,
        b.received_through_type, b.mediator_id,
        b.destination_id, b.exit_notes, b.transport_type, b.vehicle_registration,
        c.name AS company_name,
        m.name AS mediator_name,
        d.name AS destination_name
    FROM batches b
    LEFT JOIN companies c ON b.company_id = c.id
    LEFT JOIN mediators m ON b.mediator_id = m.id
    LEFT JOIN destinations d ON b.destination_id = d.id
"#;

/// 明细 + 材质名称的查询列（与 map_item_record 列序对齐）
pub(super) const ITEM_RECORD_SELECT: &str = r#"
    SELECT
        bi.id, bi.batch_id, bi.material_type_id, bi.color, bi.number_of_rolls,
        mt.name AS material_type_name
    FROM batch_items bi
    LEFT JOIN material_types mt ON bi.material_type_id = mt.id
"#;

impl BatchRepository {
    /// 创建新的批次仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub(super) fn map_record(row: &Row<'_>) -> SqliteResult<BatchRecord> {
        let received: String = row.get(5)?;
        let transport: Option<String> = row.get(9)?;

        Ok(BatchRecord {
            batch: Batch {
                id: row.get(0)?,
                company_id: row.get(1)?,
                in_time: row.get(2)?,
                out_time: row.get(3)?,
                lot_number: row.get(4)?,
                received_through_type: parse_column(5, &received, ReceivedThroughType::parse)?,
                mediator_id: row.get(6)?,
                destination_id: row.get(7)?,
                exit_notes: row.get(8)?,
                transport_type: transport
                    .as_deref()
                    .map(|s| parse_column(9, s, TransportType::parse))
                    .transpose()?,
                vehicle_registration: row.get(10)?,
            },
            company_name: row.get(11)?,
            mediator_name: row.get(12)?,
            destination_name: row.get(13)?,
        })
    }

    pub(super) fn map_item_record(row: &Row<'_>) -> SqliteResult<BatchItemRecord> {
        Ok(BatchItemRecord {
            item: BatchItem {
                id: row.get(0)?,
                batch_id: row.get(1)?,
                material_type_id: row.get(2)?,
                color: row.get(3)?,
                number_of_rolls: row.get(4)?,
            },
            material_type_name: row.get(5)?,
        })
    }
}

/// 枚举列解析；未知取值视为数据损坏
fn parse_column<T>(idx: usize, raw: &str, parse: fn(&str) -> Option<T>) -> SqliteResult<T> {
    parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected enum value: {}", raw).into(),
        )
    })
}
