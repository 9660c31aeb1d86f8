//! 整合測試共用工具：以檔名設定行為的假解碼器

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use auto_video_catalog::component::decoder::{
    DecodeError, DecodeSession, Decoder, VideoMetadata,
};

pub const MIB: u64 = 1024 * 1024;

const FAKE_FRAME_RATE: f64 = 25.0;
const FAKE_JPEG: &[u8] = b"\xFF\xD8fake-frame\xFF\xD9";

/// 假影片的行為設定
#[derive(Debug, Clone, Default)]
pub struct FakeVideo {
    /// `None` 代表中繼資料無效
    pub duration_seconds: Option<f64>,
    /// 擷取失敗的秒數
    pub failing_frames: HashSet<u64>,
    /// 開啟後卡住直到收到取消訊號
    pub hang: bool,
    /// 前幾次開啟卡住，之後正常
    pub hang_first_opens: usize,
    /// 讀取長度時可開啟，擷取縮圖時無法開啟
    pub unreadable_on_extract: bool,
}

impl FakeVideo {
    pub fn lasting(duration_seconds: f64) -> Self {
        Self {
            duration_seconds: Some(duration_seconds),
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn hanging_first_open(mut self) -> Self {
        self.hang_first_opens = 1;
        self
    }

    pub fn unreadable_on_extract(mut self) -> Self {
        self.unreadable_on_extract = true;
        self
    }

    pub fn failing_at(mut self, timestamp: u64) -> Self {
        self.failing_frames.insert(timestamp);
        self
    }
}

/// 依檔名回傳設定好的影片；未設定的檔名視為無法開啟
#[derive(Default)]
pub struct FakeDecoder {
    videos: Mutex<HashMap<String, FakeVideo>>,
    opened: AtomicUsize,
    opened_by_name: Mutex<HashMap<String, usize>>,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(self, name: &str, video: FakeVideo) -> Self {
        self.set_video(name, video);
        self
    }

    pub fn set_video(&self, name: &str, video: FakeVideo) {
        self.videos.lock().unwrap().insert(name.to_string(), video);
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Decoder for FakeDecoder {
    fn open(
        &self,
        path: &Path,
        cancel_signal: &Arc<AtomicBool>,
    ) -> Result<Box<dyn DecodeSession>, DecodeError> {
        self.opened.fetch_add(1, Ordering::SeqCst);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let nth_open = {
            let mut opened_by_name = self.opened_by_name.lock().unwrap();
            let count = opened_by_name.entry(name.clone()).or_default();
            *count += 1;
            *count
        };
        let video = self.videos.lock().unwrap().get(&name).cloned();
        let Some(video) = video else {
            return Err(DecodeError::Unreadable {
                path: path.to_path_buf(),
            });
        };

        // 每次嘗試先開啟一次讀取長度（奇數次），再開啟一次擷取縮圖（偶數次）
        if video.unreadable_on_extract && nth_open % 2 == 0 {
            return Err(DecodeError::Unreadable {
                path: path.to_path_buf(),
            });
        }

        if video.hang || nth_open <= video.hang_first_opens {
            let deadline = Instant::now() + Duration::from_secs(10);
            while !cancel_signal.load(Ordering::SeqCst) && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            return Err(DecodeError::Cancelled);
        }

        Ok(Box::new(FakeSession { video }))
    }
}

struct FakeSession {
    video: FakeVideo,
}

impl DecodeSession for FakeSession {
    fn metadata(&mut self) -> Result<VideoMetadata, DecodeError> {
        let frame_count = self
            .video
            .duration_seconds
            .map_or(0, |d| (d * FAKE_FRAME_RATE).round() as i64);
        Ok(VideoMetadata {
            frame_rate: FAKE_FRAME_RATE,
            frame_count,
        })
    }

    fn frame_at(&mut self, timestamp_seconds: f64) -> Result<Vec<u8>, DecodeError> {
        if self
            .video
            .failing_frames
            .contains(&(timestamp_seconds as u64))
        {
            return Err(DecodeError::FrameFailure {
                timestamp: timestamp_seconds,
                reason: "壞掉的畫面".to_string(),
            });
        }
        Ok(FAKE_JPEG.to_vec())
    }
}

/// 建立指定大小的稀疏檔案
pub fn create_video(dir: &Path, name: &str, size_bytes: u64) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().set_len(size_bytes).unwrap();
    path
}

/// 輪詢直到條件成立或逾時
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    condition()
}
