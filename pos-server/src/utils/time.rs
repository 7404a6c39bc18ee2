//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 → 当天 00:00:00 的 Unix millis (UTC)
pub fn day_start_millis(date: NaiveDate) -> i64 {
    let dt = date.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&dt).timestamp_millis()
}

/// 日期 → 当天 23:59:59.999 的 Unix millis (UTC)
pub fn day_end_millis(date: NaiveDate) -> i64 {
    day_start_millis(date) + 86_400_000 - 1
}

/// 当前 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
