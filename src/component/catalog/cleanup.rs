use crate::tools::scan_video_files;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 移除結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemovalReport {
    pub video_removed: bool,
    pub thumbnails_removed: bool,
}

/// 移除影片與其縮圖資料夾
///
/// 先刪影片再刪縮圖：列表以影片檔為準，因此不會出現「影片還在但縮圖已消失」
/// 的中間狀態。影片刪除失敗時保留縮圖資料夾。不存在的路徑視為已移除。
///
/// 縮圖資料夾以主檔名命名，`a.mp4` 與 `a.ts` 共用 `thumbs/a`；
/// 同主檔名的其他影片仍存在時保留縮圖資料夾。
pub fn remove_video_files(video_path: &Path, thumbnail_dir: &Path) -> Result<RemovalReport> {
    let mut report = RemovalReport::default();

    match fs::remove_file(video_path) {
        Ok(()) => {
            report.video_removed = true;
            info!("已刪除影片: {}", video_path.display());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("無法刪除影片: {}", video_path.display()));
        }
    }

    if let Some(sibling) = sibling_video(video_path) {
        info!(
            "{} 仍在使用縮圖資料夾，保留: {}",
            sibling.display(),
            thumbnail_dir.display()
        );
        return Ok(report);
    }

    match fs::remove_dir_all(thumbnail_dir) {
        Ok(()) => {
            report.thumbnails_removed = true;
            info!("已刪除縮圖資料夾: {}", thumbnail_dir.display());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| {
                format!("無法刪除縮圖資料夾: {}", thumbnail_dir.display())
            });
        }
    }

    Ok(report)
}

/// 同一資料夾中主檔名相同的其他影片
fn sibling_video(video_path: &Path) -> Option<PathBuf> {
    let parent = video_path.parent()?;
    let stem = video_path.file_stem()?;

    scan_video_files(parent)
        .ok()?
        .into_iter()
        .find(|path| path != video_path && path.file_stem() == Some(stem))
}
