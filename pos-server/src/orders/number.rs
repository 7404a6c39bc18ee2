//! 订单号生成
//!
//! 格式：YYYYMMDD + 毫秒时间戳后 6 位 + 4 位随机数，共 18 位数字。
//! 人可读、近乎单调递增；碰撞概率极低，但不作为唯一性保证 ——
//! 存储层在 order_no 上另有 UNIQUE 索引兜底。

use chrono::{DateTime, Utc};
use rand::Rng;

/// 生成一个新订单号
pub fn generate_order_no() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    compose(Utc::now(), suffix)
}

fn compose(now: DateTime<Utc>, suffix: u32) -> String {
    let date_part = now.format("%Y%m%d");
    let millis_part = now.timestamp_millis() % 1_000_000;
    format!("{}{:06}{:04}", date_part, millis_part, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_no_shape() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 45).unwrap();
        let no = compose(now, 42);
        assert_eq!(no.len(), 18);
        assert!(no.starts_with("20250301"));
        assert!(no.ends_with("0042"));
        assert!(no.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn generated_numbers_are_digits_only() {
        let no = generate_order_no();
        assert_eq!(no.len(), 18);
        assert!(no.chars().all(|c| c.is_ascii_digit()));
    }
}
