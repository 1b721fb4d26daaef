// ==========================================
// 染整批次登记系统 - 批次数据仓储
// ==========================================
// 对齐: batches / batch_items 表
// 红线: Repository 不含业务校验，只保证多行写入的原子性
// 并发: 出厂为单条条件更新 (WHERE out_time IS NULL)，避免重复出厂
// ==========================================

mod commands;
mod core;
mod queries;


pub use self::core::BatchRepository;
