use crate::component::catalog::{
    CatalogEntry, CatalogView, RemovalReport, WatchedDirectory, remove_video_files,
};
use crate::component::decoder::Decoder;
use crate::component::folder_watcher::{BacklogReport, FolderWatcher, SharedDirectory};
use crate::component::supervisor::{
    ProcessingSupervisor, StatsSnapshot, SupervisorPolicy, TaskSink, WorkerPool,
};
use crate::config::{TASK_QUEUE_CAPACITY, UserSettings};
use crate::tools::{ensure_directory_exists, is_plain_file_name, is_video_file, resolve_worker_count};
use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// 處理管線的執行參數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub settle_window: Duration,
    pub policy: SupervisorPolicy,
}

impl PipelineOptions {
    #[must_use]
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            worker_count: resolve_worker_count(settings.worker_count),
            queue_capacity: TASK_QUEUE_CAPACITY,
            settle_window: settings.settle_window(),
            policy: SupervisorPolicy::default(),
        }
    }
}

/// 管線控制器
///
/// 持有目前的監看資料夾、處理執行緒池與資料夾監看器，
/// 並提供給呈現層使用的所有操作。每個操作開始時取得一次監看資料夾，
/// 整個操作都使用同一個值。
pub struct PipelineController {
    decoder: Arc<dyn Decoder>,
    current: SharedDirectory,
    pool: Arc<WorkerPool>,
    watcher: Mutex<FolderWatcher>,
}

impl PipelineController {
    pub fn new(decoder: Arc<dyn Decoder>, options: PipelineOptions) -> Result<Self> {
        let supervisor = Arc::new(ProcessingSupervisor::with_policy(
            Arc::clone(&decoder),
            options.policy,
        ));
        let pool = Arc::new(WorkerPool::new(
            supervisor,
            options.worker_count,
            options.queue_capacity,
        )?);
        let current: SharedDirectory = Arc::new(RwLock::new(None));
        let watcher = FolderWatcher::new(
            Arc::clone(&pool) as Arc<dyn TaskSink>,
            Arc::clone(&current),
            options.settle_window,
        )?;

        Ok(Self {
            decoder,
            current,
            pool,
            watcher: Mutex::new(watcher),
        })
    }

    #[must_use]
    pub fn watched_directory(&self) -> Option<WatchedDirectory> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 設定監看資料夾
    ///
    /// 資料夾與 `thumbs/` 不存在時會建立；切換後立即掃描既有影片。
    pub fn set_watch_directory(&self, path: &Path) -> Result<BacklogReport> {
        ensure_directory_exists(path)?;
        let root = path
            .canonicalize()
            .with_context(|| format!("無法解析路徑: {}", path.display()))?;
        let directory = WatchedDirectory::new(root);
        ensure_directory_exists(directory.thumbs_root())?;

        info!("設定監看資料夾: {}", directory.root().display());
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .switch_to(directory)
    }

    pub fn list_videos(&self) -> Result<Vec<CatalogEntry>> {
        let directory = self.require_directory()?;
        CatalogView::new(&directory, self.decoder.as_ref()).list_videos()
    }

    pub fn list_videos_json(&self) -> Result<String> {
        let entries = self.list_videos()?;
        serde_json::to_string_pretty(&entries).context("無法序列化影片列表")
    }

    /// 移除影片與其縮圖，與處理流程捨棄影片時使用同一個移除程序
    pub fn remove_video(&self, video_name: &str) -> Result<RemovalReport> {
        let directory = self.require_directory()?;
        validate_video_name(video_name)?;

        let report = remove_video_files(
            &directory.video_path(video_name),
            &directory.thumbnail_dir_for_name(video_name),
        )?;
        if !report.video_removed {
            info!("影片不存在: {video_name}");
        }
        Ok(report)
    }

    pub fn read_video(&self, video_name: &str) -> Result<Vec<u8>> {
        let directory = self.require_directory()?;
        validate_video_name(video_name)?;

        let path = directory.video_path(video_name);
        fs::read(&path).with_context(|| format!("無法讀取影片: {}", path.display()))
    }

    pub fn read_thumbnail(&self, video_name: &str, file_name: &str) -> Result<Vec<u8>> {
        let directory = self.require_directory()?;
        validate_video_name(video_name)?;

        let is_jpeg = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
        if !is_plain_file_name(file_name) || !is_jpeg {
            bail!("無效的縮圖檔名: {file_name}");
        }

        let path = directory.thumbnail_dir_for_name(video_name).join(file_name);
        fs::read(&path).with_context(|| format!("無法讀取縮圖: {}", path.display()))
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.pool.stats()
    }

    /// 佇列中與處理中的工作數
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pool.pending()
    }

    /// 停止監看並等待佇列中的工作完成
    pub fn shutdown(&self) {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
        self.pool.shutdown();
        info!("處理管線已停止");
    }

    fn require_directory(&self) -> Result<WatchedDirectory> {
        self.watched_directory()
            .context("尚未設定監看資料夾")
    }
}

fn validate_video_name(video_name: &str) -> Result<()> {
    if !is_plain_file_name(video_name) || !is_video_file(Path::new(video_name)) {
        bail!("無效的影片檔名: {video_name}");
    }
    Ok(())
}
