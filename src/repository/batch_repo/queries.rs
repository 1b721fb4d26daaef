use super::core::{BatchRepository, BATCH_RECORD_SELECT, ITEM_RECORD_SELECT};
use crate::domain::batch::{BatchDetail, BatchItemRecord, BatchRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, OptionalExtension, Result as SqliteResult};

impl BatchRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 全部批次（含公司/中间人/去向名称），入厂时间倒序
    pub fn list_all(&self) -> RepositoryResult<Vec<BatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY b.in_time DESC, b.id DESC", BATCH_RECORD_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 在厂批次 (out_time IS NULL)，入厂时间倒序
    pub fn list_open(&self) -> RepositoryResult<Vec<BatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE b.out_time IS NULL ORDER BY b.in_time DESC, b.id DESC",
            BATCH_RECORD_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::map_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 按 id 查询批次
    ///
    /// # 返回
    /// - Ok(Some(BatchRecord)): 找到
    /// - Ok(None): 不存在
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<BatchRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE b.id = ?1", BATCH_RECORD_SELECT);
        let record = conn
            .query_row(&sql, params![id], Self::map_record)
            .optional()?;
        Ok(record)
    }

    /// 批次详情（含明细）
    ///
    /// # 返回
    /// - Err(NotFound): 批次不存在
    pub fn get_detail(&self, id: i64) -> RepositoryResult<BatchDetail> {
        let conn = self.get_conn()?;

        let sql = format!("{} WHERE b.id = ?1", BATCH_RECORD_SELECT);
        let record = conn
            .query_row(&sql, params![id], Self::map_record)
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Batch".to_string(),
                id: id.to_string(),
            })?;

        let items_sql = format!("{} WHERE bi.batch_id = ?1 ORDER BY bi.id ASC", ITEM_RECORD_SELECT);
        let mut stmt = conn.prepare(&items_sql)?;
        let items = stmt
            .query_map(params![id], Self::map_item_record)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(BatchDetail { record, items })
    }

    /// 批次明细（含材质名称）；批次不存在时返回空列表
    pub fn list_items(&self, batch_id: i64) -> RepositoryResult<Vec<BatchItemRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE bi.batch_id = ?1 ORDER BY bi.id ASC", ITEM_RECORD_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![batch_id], Self::map_item_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// 批次是否存在且在厂
    pub fn is_open(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let open = conn
            .query_row(
                "SELECT 1 FROM batches WHERE id = ?1 AND out_time IS NULL",
                params![id],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(open)
    }

    /// 批次总数
    pub fn count_batches(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM batches", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 明细总数（全部批次）
    pub fn count_items(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM batch_items", [], |row| row.get(0))?;
        Ok(n)
    }
}
