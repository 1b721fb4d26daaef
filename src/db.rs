// ==========================================
// 染整批次登记系统 - SQLite 连接初始化与迁移
// ==========================================
// 目标:
// - 统一所有连接的 PRAGMA 行为（外键、busy_timeout）
// - 版本化迁移: 每个版本只执行一次，重启不丢数据
// - 启动种子: 由公司名补齐去向（幂等，失败不阻塞启动）
// ==========================================

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// 默认材质
pub const DEFAULT_MATERIAL_TYPES: [&str; 3] = ["Cotton", "Polycotton", "Polyester"];

/// 迁移: (版本号, 说明, SQL)
const MIGRATIONS: &[(i64, &str, &str)] = &[
    (1, "initial schema", SCHEMA_V1),
    (2, "default material types", SEED_V2),
];

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS mediators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS material_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS destinations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS batches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    in_time TEXT NOT NULL,
    out_time TEXT,
    lot_number TEXT NOT NULL,
    received_through_type TEXT NOT NULL CHECK(received_through_type IN ('direct', 'mediator')),
    mediator_id INTEGER REFERENCES mediators(id),
    destination_id INTEGER REFERENCES destinations(id),
    exit_notes TEXT,
    transport_type TEXT CHECK(transport_type IS NULL OR transport_type IN ('internal', 'external')),
    vehicle_registration TEXT
);

CREATE TABLE IF NOT EXISTS batch_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    batch_id INTEGER NOT NULL REFERENCES batches(id) ON DELETE CASCADE,
    material_type_id INTEGER NOT NULL REFERENCES material_types(id),
    color TEXT NOT NULL,
    number_of_rolls INTEGER NOT NULL DEFAULT 1 CHECK(number_of_rolls > 0)
);

CREATE INDEX IF NOT EXISTS idx_batches_out_time ON batches(out_time);
CREATE INDEX IF NOT EXISTS idx_batches_in_time ON batches(in_time DESC);
CREATE INDEX IF NOT EXISTS idx_batch_items_batch_id ON batch_items(batch_id);
"#;

const SEED_V2: &str = r#"
INSERT OR IGNORE INTO material_types (name) VALUES ('Cotton');
INSERT OR IGNORE INTO material_types (name) VALUES ('Polycotton');
INSERT OR IGNORE INTO material_types (name) VALUES ('Polyester');
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存库（测试、演示用），已完成迁移
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 执行未应用的迁移
///
/// # 返回
/// - Ok(n): 本次新应用的迁移数量（已是最新时为 0）
pub fn run_migrations(conn: &mut Connection) -> rusqlite::Result<usize> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )?;

    let current = read_schema_version(conn)?.unwrap_or(0);
    if current > CURRENT_SCHEMA_VERSION {
        tracing::warn!(
            db_version = current,
            code_version = CURRENT_SCHEMA_VERSION,
            "数据库版本高于程序版本，跳过迁移"
        );
        return Ok(0);
    }

    let mut applied = 0usize;
    for (version, description, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > current) {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_version (version, description) VALUES (?1, ?2)",
            params![version, description],
        )?;
        tx.commit()?;
        tracing::info!(version, description, "schema 迁移完成");
        applied += 1;
    }

    Ok(applied)
}

/// 由公司名补齐去向（幂等）
///
/// # 返回
/// - Ok(n): 新增的去向数量
pub fn seed_destinations_from_companies(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT OR IGNORE INTO destinations (name, created_at)
        SELECT name, ?1 FROM companies
        "#,
        params![chrono::Utc::now()],
    )
}

/// 启动初始化: 迁移 + 去向种子
///
/// 迁移失败直接返回错误；种子失败只记录告警。
pub fn initialize(conn: &mut Connection) -> rusqlite::Result<()> {
    run_migrations(conn)?;

    match seed_destinations_from_companies(conn) {
        Ok(n) => tracing::info!(inserted = n, "已由公司补齐默认去向"),
        Err(e) => tracing::warn!("由公司补齐默认去向失败(将继续启动): {}", e),
    }

    Ok(())
}
