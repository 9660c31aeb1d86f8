use crate::component::qualification::DiscardReason;
use std::path::PathBuf;

/// 單一影片的處理工作：影片路徑與其縮圖資料夾
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngestionTask {
    pub video_path: PathBuf,
    pub thumbnail_dir: PathBuf,
}

impl IngestionTask {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.video_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.video_path.display().to_string())
    }
}

/// 工作的最終狀態
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// 通過判定並完成縮圖擷取（擷取張數可能為 0）
    Kept { frames_written: usize, attempts: u32 },
    /// 未通過判定，影片與縮圖已移除
    Discarded { reason: DiscardReason, attempts: u32 },
    /// 影片在處理前已消失，只清除縮圖資料夾
    Vanished { attempts: u32 },
    /// 重試次數用盡，強制移除
    RemovedAfterFailure { attempts: u32 },
}

impl TaskOutcome {
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Kept { attempts, .. }
            | Self::Discarded { attempts, .. }
            | Self::Vanished { attempts }
            | Self::RemovedAfterFailure { attempts } => *attempts,
        }
    }
}
