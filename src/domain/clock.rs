// ==========================================
// 染整批次登记系统 - 工厂本地时钟
// ==========================================
// 存储: UTC
// 展示: 工厂所在时区（默认 Asia/Kolkata, UTC+05:30, 无夏令时）
// ==========================================

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// 默认时区偏移（分钟）：Asia/Kolkata
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// 默认时区名称
pub const DEFAULT_TIMEZONE_NAME: &str = "Asia/Kolkata";

/// 工厂本地时钟
///
/// 入厂/出厂时间统一由该时钟采集，保证同一进程内时间来源一致。
#[derive(Debug, Clone)]
pub struct FacilityClock {
    offset: FixedOffset,
    timezone_name: String,
}

impl FacilityClock {
    /// 按分钟偏移构建时钟；偏移超出 ±24h 时返回 None
    pub fn new(utc_offset_minutes: i32, timezone_name: impl Into<String>) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        Some(Self {
            offset,
            timezone_name: timezone_name.into(),
        })
    }

    /// 当前时刻（UTC，用于落库）
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// 转换为工厂本地时间（用于对外展示）
    pub fn to_local(&self, ts: &DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn timezone_name(&self) -> &str {
        &self.timezone_name
    }
}

impl Default for FacilityClock {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_MINUTES, DEFAULT_TIMEZONE_NAME).unwrap_or_else(|| Self {
            offset: Utc.fix(),
            timezone_name: "UTC".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_is_india_standard_time() {
        let clock = FacilityClock::default();
        assert_eq!(clock.offset().local_minus_utc(), 330 * 60);
        assert_eq!(clock.timezone_name(), "Asia/Kolkata");
    }

    #[test]
    fn test_to_local_renders_explicit_offset() {
        let clock = FacilityClock::default();
        let utc = Utc.with_ymd_and_hms(2026, 1, 18, 20, 0, 0).unwrap();
        let local = clock.to_local(&utc);
        assert_eq!(local.to_rfc3339(), "2026-01-19T01:30:00+05:30");
    }

    #[test]
    fn test_invalid_offset_rejected() {
        assert!(FacilityClock::new(25 * 60, "Nowhere").is_none());
        assert!(FacilityClock::new(-300, "America/New_York").is_some());
    }
}
