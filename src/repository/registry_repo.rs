// ==========================================
// 染整批次登记系统 - 基础资料数据仓储
// ==========================================
// 公司 / 中间人 / 材质 / 去向 共用同一实现，按 RegistryKind 区分表
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::registry::{RegistryEntry, RegistryKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{
    params, Connection, OptionalExtension, Result as SqliteResult, Row, TransactionBehavior,
};
use std::sync::{Arc, Mutex};

// ==========================================
// RegistryRepository - 基础资料仓储
// ==========================================
pub struct RegistryRepository {
    conn: Arc<Mutex<Connection>>,
    kind: RegistryKind,
}

impl RegistryRepository {
    /// 创建指定种类的仓储
    pub fn new(conn: Arc<Mutex<Connection>>, kind: RegistryKind) -> Self {
        Self { conn, kind }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn select_columns(&self) -> &'static str {
        if self.kind.has_created_at() {
            "id, name, created_at"
        } else {
            "id, name, NULL AS created_at"
        }
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<RegistryEntry> {
        Ok(RegistryEntry {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get::<_, Option<DateTime<Utc>>>(2)?,
        })
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 全部条目，按名称升序
    pub fn list(&self) -> RepositoryResult<Vec<RegistryEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY name ASC",
            self.select_columns(),
            self.kind.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RegistryEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            self.select_columns(),
            self.kind.table()
        );
        let entry = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(entry)
    }

    /// 按名称查询（精确匹配，区分大小写）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<RegistryEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE name = ?1",
            self.select_columns(),
            self.kind.table()
        );
        let entry = conn
            .query_row(&sql, params![name], Self::map_row)
            .optional()?;
        Ok(entry)
    }

    pub fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", self.kind.table());
        let found = conn
            .query_row(&sql, params![id], |_row| Ok(true))
            .optional()?
            .unwrap_or(false);
        Ok(found)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", self.kind.table());
        let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n)
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入新条目（名称需已规范化）
    ///
    /// # 返回
    /// - Ok(RegistryEntry): 新条目
    /// - Err(UniqueConstraintViolation): 名称已存在，表内容不变
    pub fn insert(&self, name: &str) -> RepositoryResult<RegistryEntry> {
        let conn = self.get_conn()?;
        insert_entry(&conn, self.kind, name)
    }

    /// 插入公司并同步登记同名去向（同一事务；去向已存在时忽略）
    pub fn insert_company_with_destination(&self, name: &str) -> RepositoryResult<RegistryEntry> {
        if self.kind != RegistryKind::Company {
            return Err(RepositoryError::InternalError(format!(
                "insert_company_with_destination called on {} registry",
                self.kind
            )));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let entry = insert_entry(&tx, RegistryKind::Company, name)?;
        let mirrored = tx.execute(
            "INSERT OR IGNORE INTO destinations (name, created_at) VALUES (?1, ?2)",
            params![name, Utc::now()],
        )?;
        tx.commit()?;

        if mirrored == 0 {
            tracing::debug!(name, "同名去向已存在");
        }
        Ok(entry)
    }

    /// 存在则返回，不存在则创建（幂等）
    pub fn ensure(&self, name: &str) -> RepositoryResult<RegistryEntry> {
        let conn = self.get_conn()?;
        let sql = if self.kind.has_created_at() {
            format!(
                "INSERT OR IGNORE INTO {} (name, created_at) VALUES (?1, ?2)",
                self.kind.table()
            )
        } else {
            format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", self.kind.table())
        };
        if self.kind.has_created_at() {
            conn.execute(&sql, params![name, Utc::now()])?;
        } else {
            conn.execute(&sql, params![name])?;
        }

        let select = format!(
            "SELECT {} FROM {} WHERE name = ?1",
            self.select_columns(),
            self.kind.table()
        );
        let entry = conn.query_row(&select, params![name], Self::map_row)?;
        Ok(entry)
    }
}

/// 在给定连接/事务上插入条目
fn insert_entry(
    conn: &Connection,
    kind: RegistryKind,
    name: &str,
) -> RepositoryResult<RegistryEntry> {
    let created_at = if kind.has_created_at() {
        let now = Utc::now();
        conn.execute(
            &format!("INSERT INTO {} (name, created_at) VALUES (?1, ?2)", kind.table()),
            params![name, now],
        )?;
        Some(now)
    } else {
        conn.execute(
            &format!("INSERT INTO {} (name) VALUES (?1)", kind.table()),
            params![name],
        )?;
        None
    };

    Ok(RegistryEntry {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        created_at,
    })
}
