//! 时长格式化
//!
//! 聊天输出里展示封禁剩余时间，按量级取两段："3d 4h 10m"、"2h 5m"、"9m 30s"。

use chrono::Duration;

pub fn format_duration(d: Duration) -> String {
    if d.num_days() >= 1 {
        format!("{}d {}h {}m", d.num_days(), d.num_hours() % 24, d.num_minutes() % 60)
    } else if d.num_hours() >= 1 {
        format!("{}h {}m", d.num_hours(), d.num_minutes() % 60)
    } else {
        format!("{}m {}s", d.num_minutes(), d.num_seconds() % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_hours_minutes() {
        let d = Duration::days(3) + Duration::hours(4) + Duration::minutes(10);
        assert_eq!(format_duration(d), "3d 4h 10m");
    }

    #[test]
    fn hours_minutes() {
        let d = Duration::hours(2) + Duration::minutes(5);
        assert_eq!(format_duration(d), "2h 5m");
    }

    #[test]
    fn minutes_seconds() {
        let d = Duration::minutes(9) + Duration::seconds(30);
        assert_eq!(format_duration(d), "9m 30s");
    }

    #[test]
    fn sub_minute() {
        assert_eq!(format_duration(Duration::seconds(45)), "0m 45s");
    }
}
