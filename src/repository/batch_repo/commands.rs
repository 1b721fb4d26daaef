use super::core::BatchRepository;
use crate::domain::batch::{BatchFields, CreatedBatch, ExitFields, NewBatchItem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

impl BatchRepository {
    // ==========================================
    // 写入操作（均为单事务）
    // ==========================================

    /// 创建批次及其明细
    ///
    /// 任一明细写入失败时整体回滚，批次行不会残留。
    ///
    /// # 返回
    /// - Ok(CreatedBatch): 新批次 id 与入厂时间
    pub fn create_batch(
        &self,
        fields: &BatchFields,
        in_time: DateTime<Utc>,
        items: &[NewBatchItem],
    ) -> RepositoryResult<CreatedBatch> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            r#"
            INSERT INTO batches (
                company_id, in_time, lot_number, received_through_type, mediator_id
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                fields.company_id,
                in_time,
                fields.lot_number,
                fields.received_through_type.to_db_str(),
                fields.mediator_id,
            ],
        )?;
        let batch_id = tx.last_insert_rowid();

        insert_items(&tx, batch_id, items)?;
        tx.commit()?;

        Ok(CreatedBatch {
            id: batch_id,
            in_time,
        })
    }

    /// 出厂登记
    ///
    /// 单条条件更新：仅当 out_time IS NULL 时写入，检查与更新不可分割。
    ///
    /// # 返回
    /// - Err(NotFoundOrAlreadyExited): 批次不存在或已出厂
    pub fn exit_batch(&self, id: i64, exit: &ExitFields) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let changed = conn.execute(
            r#"
            UPDATE batches
            SET out_time = ?1,
                destination_id = ?2,
                exit_notes = ?3,
                transport_type = ?4,
                vehicle_registration = ?5
            WHERE id = ?6 AND out_time IS NULL
            "#,
            params![
                exit.out_time,
                exit.destination_id,
                exit.exit_notes,
                exit.transport_type.to_db_str(),
                exit.vehicle_registration.as_ref().map(|v| v.as_str()),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFoundOrAlreadyExited { id });
        }
        Ok(())
    }

    /// 修改在厂批次：更新字段 + 全量替换明细
    ///
    /// # 返回
    /// - Err(NotFoundOrAlreadyExited): 批次不存在或已出厂（不做任何修改）
    pub fn update_batch(
        &self,
        id: i64,
        fields: &BatchFields,
        items: &[NewBatchItem],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        ensure_open(&tx, id)?;

        tx.execute(
            r#"
            UPDATE batches
            SET company_id = ?1,
                lot_number = ?2,
                received_through_type = ?3,
                mediator_id = ?4
            WHERE id = ?5 AND out_time IS NULL
            "#,
            params![
                fields.company_id,
                fields.lot_number,
                fields.received_through_type.to_db_str(),
                fields.mediator_id,
                id,
            ],
        )?;

        tx.execute("DELETE FROM batch_items WHERE batch_id = ?1", params![id])?;
        insert_items(&tx, id, items)?;

        tx.commit()?;
        Ok(())
    }

    /// 删除在厂批次（先删明细，再删批次）
    ///
    /// # 返回
    /// - Err(NotFoundOrAlreadyExited): 批次不存在或已出厂（不做任何修改）
    pub fn delete_batch(&self, id: i64) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        ensure_open(&tx, id)?;

        tx.execute("DELETE FROM batch_items WHERE batch_id = ?1", params![id])?;
        let removed = tx.execute(
            "DELETE FROM batches WHERE id = ?1 AND out_time IS NULL",
            params![id],
        )?;
        if removed != 1 {
            return Err(RepositoryError::DatabaseTransactionError(format!(
                "删除批次影响行数异常: id={}, rows={}",
                id, removed
            )));
        }

        tx.commit()?;
        Ok(())
    }
}

/// 事务内确认批次在厂
fn ensure_open(conn: &Connection, id: i64) -> RepositoryResult<()> {
    let open = conn
        .query_row(
            "SELECT 1 FROM batches WHERE id = ?1 AND out_time IS NULL",
            params![id],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if open {
        Ok(())
    } else {
        Err(RepositoryError::NotFoundOrAlreadyExited { id })
    }
}

/// 批量写入明细
fn insert_items(conn: &Connection, batch_id: i64, items: &[NewBatchItem]) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO batch_items (batch_id, material_type_id, color, number_of_rolls)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )?;

    for item in items {
        stmt.execute(params![
            batch_id,
            item.material_type_id,
            item.color,
            item.number_of_rolls,
        ])?;
    }
    Ok(())
}
