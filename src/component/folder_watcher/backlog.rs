use crate::component::catalog::WatchedDirectory;
use crate::component::supervisor::TaskSink;
use crate::tools::{ensure_directory_exists, scan_video_files};
use anyhow::Result;
use log::{debug, info, warn};

/// 既有影片掃描結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BacklogReport {
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 掃描資料夾中已存在的影片
///
/// 已有縮圖資料夾的影片視為處理過而略過（不重新判定）；
/// 其餘影片先建立縮圖資料夾再送出工作，因此重複掃描不會產生重複工作。
pub fn scan_backlog(directory: &WatchedDirectory, sink: &dyn TaskSink) -> Result<BacklogReport> {
    let mut report = BacklogReport::default();

    for video_path in scan_video_files(directory.root())? {
        let task = directory.task_for(&video_path);

        if task.thumbnail_dir.exists() {
            debug!("已處理過，略過: {}", video_path.display());
            report.skipped += 1;
            continue;
        }

        if let Err(e) = ensure_directory_exists(&task.thumbnail_dir) {
            warn!("{e:#}");
            report.failed += 1;
            continue;
        }

        if sink.submit(task) {
            report.submitted += 1;
        } else {
            report.skipped += 1;
        }
    }

    info!(
        "既有影片掃描完成 {}: 送出 {}, 略過 {}, 失敗 {}",
        directory.root().display(),
        report.submitted,
        report.skipped,
        report.failed
    );

    Ok(report)
}
