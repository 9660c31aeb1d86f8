use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 由 notify 事件整理出的檔案變化
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSignal {
    /// 新建立或移入的檔案
    Arrived(PathBuf),
    /// 內容或屬性變更
    Touched(PathBuf),
    /// 刪除或移出
    Removed(PathBuf),
}

/// 將 notify 事件轉換為檔案變化
#[must_use]
pub fn classify(event: &Event) -> Vec<FileSignal> {
    let paths = event.paths.iter().cloned();

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(FileSignal::Arrived).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut signals = Vec::new();
            if let Some(from) = event.paths.first() {
                signals.push(FileSignal::Removed(from.clone()));
            }
            if let Some(to) = event.paths.get(1) {
                signals.push(FileSignal::Arrived(to.clone()));
            }
            signals
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) | EventKind::Remove(_) => {
            paths.map(FileSignal::Removed).collect()
        }
        EventKind::Modify(_) => paths.map(FileSignal::Touched).collect(),
        _ => Vec::new(),
    }
}

/// 新檔案的靜置等待
///
/// 檔案出現後持續有寫入時不斷延後，直到靜置時間內沒有新事件才放行。
pub struct EventSettler {
    pending: HashMap<PathBuf, Instant>,
    settle: Duration,
}

impl EventSettler {
    #[must_use]
    pub fn new(settle: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            settle,
        }
    }

    /// 記錄新檔案；已在等待中的檔案只更新時間（重複的建立事件）
    pub fn arrived(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now);
    }

    /// 只延後已在等待中的檔案，未曾出現過的路徑忽略
    pub fn touched(&mut self, path: &Path, now: Instant) {
        if let Some(last_seen) = self.pending.get_mut(path) {
            *last_seen = now;
        }
    }

    pub fn forget(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// 取出已靜置足夠時間的檔案（依路徑排序）
    pub fn take_ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let settle = self.settle;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last_seen)| now.duration_since(**last_seen) >= settle)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &ready {
            self.pending.remove(path);
        }

        ready.sort();
        ready
    }
}
