pub const UNKNOWN_LENGTH: &str = "Unknown";

/// 將秒數格式化為 `HH:MM:SS`，無法取得長度時回傳 "Unknown"
#[must_use]
pub fn format_length(duration_seconds: Option<f64>) -> String {
    let Some(seconds) = duration_seconds.filter(|d| d.is_finite() && *d >= 0.0) else {
        return UNKNOWN_LENGTH.to_string();
    };

    let secs = seconds as u64;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(Some(600.0)), "00:10:00");
        assert_eq!(format_length(Some(3725.9)), "01:02:05");
        assert_eq!(format_length(Some(0.0)), "00:00:00");
    }

    #[test]
    fn test_format_length_unknown() {
        assert_eq!(format_length(None), UNKNOWN_LENGTH);
        assert_eq!(format_length(Some(f64::NAN)), UNKNOWN_LENGTH);
        assert_eq!(format_length(Some(-1.0)), UNKNOWN_LENGTH);
    }
}
