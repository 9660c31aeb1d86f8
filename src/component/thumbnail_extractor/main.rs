use super::timestamp_selector::{extraction_timestamps, thumbnail_file_name};
use crate::component::decoder::{DecodeError, Decoder};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("無法建立縮圖資料夾 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 縮圖擷取結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub thumbnail_paths: Vec<PathBuf>,
    pub failed_count: usize,
}

impl ExtractionReport {
    #[must_use]
    pub fn written(&self) -> usize {
        self.thumbnail_paths.len()
    }
}

/// 擷取影片縮圖到 `output_dir`
///
/// `output_dir` 不存在時會建立；已存在時只新增檔案，不會刪除。
/// 解碼工作階段在所有離開路徑上都會隨 drop 釋放。
pub fn extract_thumbnails(
    decoder: &dyn Decoder,
    video_path: &Path,
    output_dir: &Path,
    cancel_signal: &Arc<AtomicBool>,
) -> Result<ExtractionReport, ExtractError> {
    fs::create_dir_all(output_dir).map_err(|source| ExtractError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut session = decoder.open(video_path, cancel_signal)?;
    let duration = session.metadata()?.duration_seconds()?;
    let timestamps = extraction_timestamps(duration);

    debug!(
        "擷取 {} 張縮圖: {} ({duration:.1}s)",
        timestamps.len(),
        video_path.display()
    );

    let mut report = ExtractionReport::default();

    for timestamp in timestamps {
        if cancel_signal.load(Ordering::SeqCst) {
            return Err(DecodeError::Cancelled.into());
        }

        let image = match session.frame_at(timestamp as f64) {
            Ok(image) => image,
            Err(DecodeError::Cancelled) => return Err(DecodeError::Cancelled.into()),
            Err(e) => {
                warn!(
                    "無法擷取 {} 在 {timestamp} 秒的畫面: {e}",
                    video_path.display()
                );
                report.failed_count += 1;
                continue;
            }
        };

        // 取消後不再寫入，避免在已被移除的資料夾留下檔案
        if cancel_signal.load(Ordering::SeqCst) {
            return Err(DecodeError::Cancelled.into());
        }

        let thumb_path = output_dir.join(thumbnail_file_name(timestamp));
        match fs::write(&thumb_path, image) {
            Ok(()) => report.thumbnail_paths.push(thumb_path),
            Err(e) => {
                warn!("無法寫入縮圖 {}: {e}", thumb_path.display());
                report.failed_count += 1;
            }
        }
    }

    info!(
        "縮圖擷取完成 {}: 成功 {}, 失敗 {}",
        video_path.display(),
        report.written(),
        report.failed_count
    );

    Ok(report)
}
