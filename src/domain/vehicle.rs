// ==========================================
// 染整批次登记系统 - 车牌号值对象
// ==========================================
// 格式: 2位字母 + 1~2位数字 + 1~2位字母 + 1~4位数字
// 组间允许可选的 '-' 或空格，仅 ASCII 字母（忽略大小写）
// 存储: 去除空白后统一大写
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static VEHICLE_REGISTRATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2}[-\s]?[0-9]{1,2}[-\s]?[A-Za-z]{1,2}[-\s]?[0-9]{1,4}$")
        .expect("vehicle registration pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VehicleRegistrationError {
    #[error("Vehicle registration is required for external transport")]
    Missing,

    #[error("Please enter a valid vehicle registration number")]
    Malformed(String),
}

/// 已校验的车牌号（大写、无空白）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleRegistration(String);

impl VehicleRegistration {
    /// 规范化并校验车牌号
    ///
    /// # 示例
    /// - "mh12ab1234" -> "MH12AB1234"
    /// - "MH 12 AB 1234" -> "MH12AB1234"
    /// - "ZZ" -> Malformed
    pub fn parse(raw: &str) -> Result<Self, VehicleRegistrationError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(VehicleRegistrationError::Missing);
        }
        if !VEHICLE_REGISTRATION_RE.is_match(&compact) {
            return Err(VehicleRegistrationError::Malformed(raw.to_string()));
        }
        Ok(Self(compact.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VehicleRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_is_upper_cased() {
        let reg = VehicleRegistration::parse("mh12ab1234").unwrap();
        assert_eq!(reg.as_str(), "MH12AB1234");
    }

    #[test]
    fn test_internal_whitespace_is_stripped() {
        let reg = VehicleRegistration::parse(" MH 12 AB 1234 ").unwrap();
        assert_eq!(reg.as_str(), "MH12AB1234");
    }

    #[test]
    fn test_hyphen_separators_are_kept() {
        let reg = VehicleRegistration::parse("gj-5-c-7").unwrap();
        assert_eq!(reg.as_str(), "GJ-5-C-7");
    }

    #[test]
    fn test_too_short_is_rejected() {
        assert_eq!(
            VehicleRegistration::parse("ZZ"),
            Err(VehicleRegistrationError::Malformed("ZZ".to_string()))
        );
    }

    #[test]
    fn test_blank_is_missing() {
        assert_eq!(
            VehicleRegistration::parse("   "),
            Err(VehicleRegistrationError::Missing)
        );
    }

    #[test]
    fn test_non_ascii_letters_are_rejected() {
        // 长 s (U+017F) 与开尔文符号 (U+212A) 在 Unicode 大小写折叠下等同 S / K
        assert!(VehicleRegistration::parse("\u{017F}\u{017F}12AB1234").is_err());
        assert!(VehicleRegistration::parse("MH12\u{212A}A1234").is_err());
        assert!(VehicleRegistration::parse("MH12ÄB1234").is_err());
    }

    #[test]
    fn test_group_lengths_are_bounded() {
        // 数字组超过4位
        assert!(VehicleRegistration::parse("MH12AB12345").is_err());
        // 首组必须是2位字母
        assert!(VehicleRegistration::parse("M12AB1234").is_err());
        // 中间字母组最多2位
        assert!(VehicleRegistration::parse("MH12ABC1234").is_err());
        // 双分隔符
        assert!(VehicleRegistration::parse("MH--12AB1234").is_err());
    }
}
