use super::backlog::{BacklogReport, scan_backlog};
use super::event_settler::{EventSettler, FileSignal, classify};
use crate::component::catalog::WatchedDirectory;
use crate::component::supervisor::TaskSink;
use crate::tools::{ensure_directory_exists, is_video_file};
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 事件迴圈在沒有事件時的檢查間隔
const EVENT_TICK: Duration = Duration::from_millis(200);

/// 目前的監看資料夾，由控制器與監看器共用
pub type SharedDirectory = Arc<RwLock<Option<WatchedDirectory>>>;

/// 監看單一資料夾（不含子資料夾）的新影片
///
/// 切換資料夾時先停止監看舊資料夾，再監看新資料夾並掃描既有影片。
/// 新檔案需靜置一段時間沒有寫入後才送出，避免處理到複製中的檔案。
pub struct FolderWatcher {
    watcher: RecommendedWatcher,
    current: SharedDirectory,
    sink: Arc<dyn TaskSink>,
    stop_signal: Arc<AtomicBool>,
    event_loop: Option<JoinHandle<()>>,
}

impl FolderWatcher {
    pub fn new(sink: Arc<dyn TaskSink>, current: SharedDirectory, settle: Duration) -> Result<Self> {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let _ = event_tx.send(result);
        })
        .context("無法建立檔案監看器")?;

        let stop_signal = Arc::new(AtomicBool::new(false));
        let event_loop = thread::Builder::new()
            .name("folder-watcher".to_string())
            .spawn({
                let current = Arc::clone(&current);
                let sink = Arc::clone(&sink);
                let stop_signal = Arc::clone(&stop_signal);
                move || run_event_loop(&event_rx, &current, sink.as_ref(), settle, &stop_signal)
            })
            .context("無法啟動監看執行緒")?;

        Ok(Self {
            watcher,
            current,
            sink,
            stop_signal,
            event_loop: Some(event_loop),
        })
    }

    /// 切換監看資料夾並掃描其中既有的影片
    pub fn switch_to(&mut self, directory: WatchedDirectory) -> Result<BacklogReport> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(previous) = &previous {
            match self.watcher.unwatch(previous.root()) {
                Ok(()) => info!("停止監看資料夾: {}", previous.root().display()),
                Err(e) => warn!("停止監看 {} 失敗: {e}", previous.root().display()),
            }
        }

        if let Err(e) = self
            .watcher
            .watch(directory.root(), RecursiveMode::NonRecursive)
        {
            // 新資料夾無法監看時恢復原本的資料夾
            if let Some(previous) = previous {
                self.restore(previous);
            }
            return Err(e)
                .with_context(|| format!("無法監看資料夾: {}", directory.root().display()));
        }

        self.set_current(Some(directory.clone()));
        info!("開始監看資料夾: {}", directory.root().display());

        scan_backlog(&directory, self.sink.as_ref())
    }

    fn restore(&mut self, previous: WatchedDirectory) {
        match self
            .watcher
            .watch(previous.root(), RecursiveMode::NonRecursive)
        {
            Ok(()) => {
                info!("恢復監看資料夾: {}", previous.root().display());
                self.set_current(Some(previous));
            }
            Err(e) => warn!("無法恢復監看 {}: {e}", previous.root().display()),
        }
    }

    fn set_current(&self, directory: Option<WatchedDirectory>) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = directory;
    }

    /// 停止事件迴圈；尚在靜置中的檔案不會送出
    pub fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.event_loop.take() {
            if handle.join().is_err() {
                warn!("監看執行緒異常結束");
            }
        }
    }
}

impl Drop for FolderWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_event_loop(
    events: &Receiver<notify::Result<Event>>,
    current: &RwLock<Option<WatchedDirectory>>,
    sink: &dyn TaskSink,
    settle: Duration,
    stop_signal: &AtomicBool,
) {
    let mut settler = EventSettler::new(settle);
    let pending_tick = EVENT_TICK.min(settle.max(Duration::from_millis(10)));

    while !stop_signal.load(Ordering::SeqCst) {
        let wait = if settler.has_pending() {
            pending_tick
        } else {
            EVENT_TICK
        };

        match events.recv_timeout(wait) {
            Ok(Ok(event)) => record_event(&event, current, &mut settler),
            Ok(Err(e)) => warn!("檔案監看錯誤: {e}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for video_path in settler.take_ready(Instant::now()) {
            dispatch(&video_path, current, sink);
        }
    }

    debug!("監看執行緒結束");
}

fn record_event(
    event: &Event,
    current: &RwLock<Option<WatchedDirectory>>,
    settler: &mut EventSettler,
) {
    let Some(directory) = snapshot(current) else {
        return;
    };
    let now = Instant::now();

    for signal in classify(event) {
        match signal {
            FileSignal::Arrived(path) => {
                if directory.contains(&path) && is_video_file(&path) && !path.is_dir() {
                    debug!("偵測到新影片: {}", path.display());
                    settler.arrived(path, now);
                }
            }
            FileSignal::Touched(path) => settler.touched(&path, now),
            FileSignal::Removed(path) => settler.forget(&path),
        }
    }
}

/// 靜置完成後建立縮圖資料夾並送出工作
///
/// 送出前檔案已被刪除時仍照常送出，由處理流程清除縮圖資料夾。
fn dispatch(video_path: &Path, current: &RwLock<Option<WatchedDirectory>>, sink: &dyn TaskSink) {
    let Some(directory) = snapshot(current) else {
        return;
    };
    if !directory.contains(video_path) {
        debug!("監看資料夾已切換，略過: {}", video_path.display());
        return;
    }

    let task = directory.task_for(video_path);
    if let Err(e) = ensure_directory_exists(&task.thumbnail_dir) {
        warn!("{e:#}");
        return;
    }

    info!("送出新影片: {}", task.display_name());
    sink.submit(task);
}

fn snapshot(current: &RwLock<Option<WatchedDirectory>>) -> Option<WatchedDirectory> {
    current
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
