use crate::component::decoder::{DecodeError, Decoder};
use crate::config::{MIN_VIDEO_DURATION_SECONDS, MIN_VIDEO_SIZE_BYTES};
use log::debug;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscardReason {
    TooSmall { size_bytes: u64 },
    UnknownDuration,
    TooShort { duration_seconds: f64 },
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { size_bytes } => write!(f, "檔案過小 ({size_bytes} bytes)"),
            Self::UnknownDuration => write!(f, "無法取得影片長度"),
            Self::TooShort { duration_seconds } => {
                write!(f, "影片過短 ({duration_seconds:.1} 秒)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Keep,
    Discard(DiscardReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// 判定結果與探測到的長度（列表顯示需要）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qualification {
    pub verdict: Verdict,
    pub duration_seconds: Option<f64>,
}

/// 依檔案大小與長度決定是否保留
#[must_use]
pub fn decide(size_bytes: u64, duration_seconds: Option<f64>) -> Verdict {
    if size_bytes < MIN_VIDEO_SIZE_BYTES {
        return Verdict::Discard(DiscardReason::TooSmall { size_bytes });
    }

    match duration_seconds {
        None => Verdict::Discard(DiscardReason::UnknownDuration),
        Some(d) if !d.is_finite() => Verdict::Discard(DiscardReason::UnknownDuration),
        Some(d) if d < MIN_VIDEO_DURATION_SECONDS => {
            Verdict::Discard(DiscardReason::TooShort { duration_seconds: d })
        }
        Some(_) => Verdict::Keep,
    }
}

/// 以獨立的解碼工作階段查詢影片長度
///
/// 影片無法開啟或中繼資料無效時回傳 `Ok(None)`；取消、逾時或無法啟動解碼程序
/// 則以錯誤回傳，由呼叫者決定是否重試。
pub fn probe_duration(
    decoder: &dyn Decoder,
    path: &Path,
    cancel_signal: &Arc<AtomicBool>,
) -> Result<Option<f64>, DecodeError> {
    let probed = decoder
        .open(path, cancel_signal)
        .and_then(|mut session| session.metadata())
        .and_then(|metadata| metadata.duration_seconds());

    match probed {
        Ok(duration) => Ok(Some(duration)),
        Err(e) if e.is_unusable_video() => {
            debug!("無法取得影片長度 {}: {e}", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 對已知大小的影片做完整判定；檔案過小時不必開啟解碼器
pub fn qualify(
    decoder: &dyn Decoder,
    path: &Path,
    size_bytes: u64,
    cancel_signal: &Arc<AtomicBool>,
) -> Result<Qualification, DecodeError> {
    if size_bytes < MIN_VIDEO_SIZE_BYTES {
        return Ok(Qualification {
            verdict: decide(size_bytes, None),
            duration_seconds: None,
        });
    }

    let duration_seconds = probe_duration(decoder, path, cancel_signal)?;
    Ok(Qualification {
        verdict: decide(size_bytes, duration_seconds),
        duration_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::decoder::{DecodeSession, VideoMetadata};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MIB: u64 = 1024 * 1024;

    struct MetadataOnlyDecoder {
        result: fn() -> Result<VideoMetadata, DecodeError>,
        opened: AtomicUsize,
    }

    struct MetadataOnlySession {
        result: fn() -> Result<VideoMetadata, DecodeError>,
    }

    impl Decoder for MetadataOnlyDecoder {
        fn open(
            &self,
            _path: &Path,
            _cancel_signal: &Arc<AtomicBool>,
        ) -> Result<Box<dyn DecodeSession>, DecodeError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MetadataOnlySession {
                result: self.result,
            }))
        }
    }

    impl DecodeSession for MetadataOnlySession {
        fn metadata(&mut self) -> Result<VideoMetadata, DecodeError> {
            (self.result)()
        }

        fn frame_at(&mut self, timestamp: f64) -> Result<Vec<u8>, DecodeError> {
            Err(DecodeError::FrameFailure {
                timestamp,
                reason: "not supported".to_string(),
            })
        }
    }

    fn decoder(result: fn() -> Result<VideoMetadata, DecodeError>) -> MetadataOnlyDecoder {
        MetadataOnlyDecoder {
            result,
            opened: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_small_files_are_discarded_regardless_of_duration() {
        for duration in [None, Some(0.0), Some(300.0), Some(10_000.0)] {
            assert!(
                matches!(
                    decide(2 * MIB - 1, duration),
                    Verdict::Discard(DiscardReason::TooSmall { .. })
                ),
                "duration={duration:?}"
            );
        }
        assert!(!decide(0, Some(600.0)).is_keep());
    }

    #[test]
    fn test_unknown_duration_is_discarded() {
        assert_eq!(
            decide(50 * MIB, None),
            Verdict::Discard(DiscardReason::UnknownDuration)
        );
        assert_eq!(
            decide(50 * MIB, Some(f64::INFINITY)),
            Verdict::Discard(DiscardReason::UnknownDuration)
        );
    }

    #[test]
    fn test_short_videos_are_discarded() {
        assert!(matches!(
            decide(50 * MIB, Some(299.9)),
            Verdict::Discard(DiscardReason::TooShort { .. })
        ));
    }

    #[test]
    fn test_threshold_boundaries_are_kept() {
        assert_eq!(decide(2 * MIB, Some(300.0)), Verdict::Keep);
        assert_eq!(decide(50 * MIB, Some(600.0)), Verdict::Keep);
    }

    #[test]
    fn test_probe_duration_maps_invalid_metadata_to_none() {
        let decoder = decoder(|| {
            Ok(VideoMetadata {
                frame_rate: 0.0,
                frame_count: 100,
            })
        });
        let cancel = Arc::new(AtomicBool::new(false));

        let duration = probe_duration(&decoder, Path::new("/v/a.mp4"), &cancel).unwrap();
        assert!(duration.is_none());
    }

    #[test]
    fn test_probe_duration_propagates_timeout() {
        let decoder = decoder(|| Err(DecodeError::TimedOut));
        let cancel = Arc::new(AtomicBool::new(false));

        let result = probe_duration(&decoder, Path::new("/v/a.mp4"), &cancel);
        assert!(matches!(result, Err(DecodeError::TimedOut)));
    }

    #[test]
    fn test_qualify_skips_probe_for_small_files() {
        let decoder = decoder(|| {
            Ok(VideoMetadata {
                frame_rate: 30.0,
                frame_count: 18_000,
            })
        });
        let cancel = Arc::new(AtomicBool::new(false));

        let result = qualify(&decoder, Path::new("/v/a.mp4"), MIB, &cancel).unwrap();
        assert!(!result.verdict.is_keep());
        assert_eq!(decoder.opened.load(Ordering::SeqCst), 0);

        let result = qualify(&decoder, Path::new("/v/a.mp4"), 50 * MIB, &cancel).unwrap();
        assert_eq!(result.verdict, Verdict::Keep);
        assert_eq!(result.duration_seconds, Some(600.0));
        assert_eq!(decoder.opened.load(Ordering::SeqCst), 1);
    }
}
