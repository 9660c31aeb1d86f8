use crate::config::THUMBNAIL_INTERVAL_SECONDS;
use regex::Regex;
use std::sync::LazyLock;

static THUMBNAIL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^thumbnail_(\d+)\.jpg$").expect("縮圖檔名正規表示式無效")
});

/// 擷取時間點：0、120、240…，只保留小於影片長度者
#[must_use]
pub fn extraction_timestamps(duration_seconds: f64) -> Vec<u64> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Vec::new();
    }

    (0..)
        .map(|i: u64| i * THUMBNAIL_INTERVAL_SECONDS)
        .take_while(|&t| (t as f64) < duration_seconds)
        .collect()
}

/// 縮圖檔名內嵌擷取秒數，例如 `thumbnail_240.jpg`
#[must_use]
pub fn thumbnail_file_name(offset_seconds: u64) -> String {
    format!("thumbnail_{offset_seconds}.jpg")
}

/// 從縮圖檔名取回擷取秒數
#[must_use]
pub fn parse_thumbnail_offset(file_name: &str) -> Option<u64> {
    THUMBNAIL_NAME
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_minute_video_yields_five_timestamps() {
        assert_eq!(extraction_timestamps(600.0), vec![0, 120, 240, 360, 480]);
    }

    #[test]
    fn test_timestamps_are_strictly_below_duration() {
        assert_eq!(extraction_timestamps(125.0), vec![0, 120]);
        assert_eq!(extraction_timestamps(120.0), vec![0]);
        assert_eq!(extraction_timestamps(119.0), vec![0]);
        assert_eq!(extraction_timestamps(300.0), vec![0, 120, 240]);
    }

    #[test]
    fn test_invalid_duration_yields_nothing() {
        assert!(extraction_timestamps(0.0).is_empty());
        assert!(extraction_timestamps(-5.0).is_empty());
        assert!(extraction_timestamps(f64::NAN).is_empty());
    }

    #[test]
    fn test_thumbnail_name_round_trip() {
        assert_eq!(thumbnail_file_name(240), "thumbnail_240.jpg");
        assert_eq!(parse_thumbnail_offset("thumbnail_240.jpg"), Some(240));
        assert_eq!(parse_thumbnail_offset("thumbnail_.jpg"), None);
        assert_eq!(parse_thumbnail_offset("cover.jpg"), None);
        assert_eq!(parse_thumbnail_offset("thumbnail_10.jpg.tmp"), None);
    }
}
