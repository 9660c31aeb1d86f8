use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

/// 允許的影片副檔名（不分大小寫）
pub const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "ts"];

/// 監看資料夾底下保留給縮圖的子資料夾名稱
pub const THUMBNAIL_DIR_NAME: &str = "thumbs";

/// 檔案大小下限（2 MiB），低於此值直接捨棄
pub const MIN_VIDEO_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// 影片長度下限（5 分鐘）
pub const MIN_VIDEO_DURATION_SECONDS: f64 = 300.0;

/// 縮圖擷取間隔（2 分鐘）
pub const THUMBNAIL_INTERVAL_SECONDS: u64 = 120;

/// 單次處理嘗試的時間上限
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// 單一影片最多嘗試次數
pub const MAX_ATTEMPTS: u32 = 3;

/// 工作佇列容量
pub const TASK_QUEUE_CAPACITY: usize = 256;

const DEFAULT_SETTLE_MILLIS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::EnUs, Self::ZhTw]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 使用者設定（儲存在工作目錄的 settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    /// 上次設定的監看資料夾，啟動時自動套用
    pub watch_directory: Option<String>,
    pub recent_paths: Vec<String>,
    /// 0 代表使用邏輯核心數
    pub worker_count: usize,
    /// 新檔案事件的靜置時間（毫秒），0 代表立即送出
    pub settle_millis: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            watch_directory: None,
            recent_paths: Vec::new(),
            worker_count: 0,
            settle_millis: DEFAULT_SETTLE_MILLIS,
        }
    }
}

impl UserSettings {
    #[must_use]
    pub const fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
