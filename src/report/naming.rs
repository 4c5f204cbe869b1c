use chrono::{DateTime, Local};

/// Archive member / file name for a snapshot captured at `captured_at`.
///
/// Second resolution: two snapshots captured within the same second share a
/// name.
pub fn archive_name(prefix: &str, captured_at: DateTime<Local>) -> String {
    format!("{}_{}.json", prefix, captured_at.format("%Y_%m_%d_%H_%M_%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::dates::{capture_time, capture_time_plus_millis};
    use chrono::TimeZone;

    #[test]
    fn test_zero_padded_format() {
        let at = Local.with_ymd_and_hms(2022, 3, 5, 4, 3, 2).unwrap();
        assert_eq!(archive_name("prices", at), "prices_2022_03_05_04_03_02.json");
    }

    #[test]
    fn test_sub_second_difference_collides() {
        let a = capture_time_plus_millis(100);
        let b = capture_time_plus_millis(900);
        assert_eq!(archive_name("prices", a), archive_name("prices", b));
    }

    #[test]
    fn test_one_second_apart_never_collides() {
        let a = capture_time();
        let b = capture_time_plus_millis(1000);
        let c = capture_time_plus_millis(-1);
        assert_ne!(archive_name("prices", a), archive_name("prices", b));
        assert_ne!(archive_name("prices", a), archive_name("prices", c));
    }
}
