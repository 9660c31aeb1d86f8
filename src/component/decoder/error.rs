use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("無法開啟影片: {path}")]
    Unreadable { path: PathBuf },

    #[error("影片中繼資料無效: frame_rate={frame_rate}, frame_count={frame_count}")]
    InvalidMetadata { frame_rate: f64, frame_count: i64 },

    #[error("無法擷取 {timestamp} 秒的畫面: {reason}")]
    FrameFailure { timestamp: f64, reason: String },

    #[error("解碼已取消")]
    Cancelled,

    #[error("解碼程序逾時")]
    TimedOut,

    #[error("無法執行解碼程序: {0}")]
    Process(#[from] io::Error),
}

impl DecodeError {
    /// 影片本身無法提供可用的長度資訊（而非環境或執行期問題）
    #[must_use]
    pub const fn is_unusable_video(&self) -> bool {
        matches!(self, Self::Unreadable { .. } | Self::InvalidMetadata { .. })
    }
}
