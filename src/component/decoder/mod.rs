//! 影片解碼協作元件
//!
//! 管線只透過 [`Decoder`] / [`DecodeSession`] 取得幀率、幀數與單張畫面，
//! 實際解碼交給外部工具（預設為 ffprobe / ffmpeg）。

mod error;
mod ffmpeg_decoder;

pub use error::DecodeError;
pub use ffmpeg_decoder::FfmpegDecoder;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 影片的幀率與總幀數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    pub frame_rate: f64,
    pub frame_count: i64,
}

impl VideoMetadata {
    /// 計算影片長度（秒）；幀率或幀數不為正時視為無效
    pub fn duration_seconds(&self) -> Result<f64, DecodeError> {
        if !(self.frame_rate > 0.0) || self.frame_count <= 0 {
            return Err(DecodeError::InvalidMetadata {
                frame_rate: self.frame_rate,
                frame_count: self.frame_count,
            });
        }
        Ok(self.frame_count as f64 / self.frame_rate)
    }
}

/// 解碼器：為每個呼叫者開啟獨立的解碼工作階段
///
/// `cancel_signal` 設為 `true` 後，工作階段內尚未完成的操作應盡快中止。
pub trait Decoder: Send + Sync {
    fn open(
        &self,
        path: &Path,
        cancel_signal: &Arc<AtomicBool>,
    ) -> Result<Box<dyn DecodeSession>, DecodeError>;
}

/// 已開啟的解碼工作階段，drop 時釋放資源
pub trait DecodeSession: Send {
    fn metadata(&mut self) -> Result<VideoMetadata, DecodeError>;

    /// 擷取指定秒數的一張畫面，回傳 JPEG 位元組
    fn frame_at(&mut self, timestamp_seconds: f64) -> Result<Vec<u8>, DecodeError>;
}
