use super::{DecodeError, DecodeSession, Decoder, VideoMetadata};
use crate::config::ATTEMPT_TIMEOUT;
use crate::tools::{ProcessOutcome, ffprobe_command, parse_frame_info, run_cancellable};
use anyhow::{Context, Result, bail};
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 以 ffprobe / ffmpeg 子程序實作的解碼器
///
/// 每個外部命令都受 `command_timeout` 限制，並在取消訊號觸發時被終止，
/// 因此被放棄的處理嘗試不會在背景持續佔用資源。
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    command_timeout: Duration,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new(ATTEMPT_TIMEOUT)
    }
}

impl FfmpegDecoder {
    #[must_use]
    pub const fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }

    /// 確認系統已安裝 ffprobe 與 ffmpeg
    pub fn check_available() -> Result<()> {
        for tool in ["ffprobe", "ffmpeg"] {
            let output = Command::new(tool)
                .arg("-version")
                .output()
                .with_context(|| format!("找不到 {tool}，請確認已安裝並加入 PATH"))?;
            if !output.status.success() {
                bail!("{tool} -version 執行失敗");
            }
        }
        Ok(())
    }
}

impl Decoder for FfmpegDecoder {
    fn open(
        &self,
        path: &Path,
        cancel_signal: &Arc<AtomicBool>,
    ) -> Result<Box<dyn DecodeSession>, DecodeError> {
        let readable = File::open(path)
            .and_then(|file| file.metadata())
            .is_ok_and(|metadata| metadata.is_file());
        if !readable {
            return Err(DecodeError::Unreadable {
                path: path.to_path_buf(),
            });
        }

        debug!("開啟解碼工作階段: {}", path.display());

        Ok(Box::new(FfmpegSession {
            path: path.to_path_buf(),
            cancel_signal: Arc::clone(cancel_signal),
            command_timeout: self.command_timeout,
            metadata: None,
        }))
    }
}

struct FfmpegSession {
    path: PathBuf,
    cancel_signal: Arc<AtomicBool>,
    command_timeout: Duration,
    metadata: Option<VideoMetadata>,
}

impl FfmpegSession {
    fn run(&self, command: Command) -> Result<(Vec<u8>, String, bool), DecodeError> {
        match run_cancellable(command, &self.cancel_signal, self.command_timeout)? {
            ProcessOutcome::Finished {
                status,
                stdout,
                stderr,
            } => Ok((stdout, stderr, status.success())),
            ProcessOutcome::Cancelled => Err(DecodeError::Cancelled),
            ProcessOutcome::TimedOut => Err(DecodeError::TimedOut),
        }
    }

    /// 兩段式 seek：`-i` 前快速跳到附近的關鍵幀，`-i` 後精準解碼到目標時間
    fn frame_command(&self, timestamp: f64) -> Command {
        let t0 = (timestamp - SEEK_MARGIN).max(0.0);
        let delta = timestamp - t0;

        let mut command = Command::new("ffmpeg");
        command.args(["-hide_banner", "-loglevel", "error"]);

        if t0 > 0.0 {
            command.arg("-ss").arg(format!("{t0:.3}"));
        }

        command.arg("-i").arg(&self.path);

        if delta > 0.0 {
            command.arg("-ss").arg(format!("{delta:.3}"));
        }

        command.args([
            "-frames:v",
            "1",
            "-an",
            "-sn",
            "-dn",
            "-threads",
            "1",
            "-f",
            "image2pipe",
            "-c:v",
            "mjpeg",
            "-q:v",
            "2",
            "pipe:1",
        ]);
        command
    }
}

impl DecodeSession for FfmpegSession {
    fn metadata(&mut self) -> Result<VideoMetadata, DecodeError> {
        if let Some(metadata) = self.metadata {
            return Ok(metadata);
        }

        let (stdout, stderr, success) = self.run(ffprobe_command(&self.path))?;
        if !success {
            debug!("ffprobe 失敗 {}: {stderr}", self.path.display());
            return Err(DecodeError::Unreadable {
                path: self.path.clone(),
            });
        }

        let info = parse_frame_info(&String::from_utf8_lossy(&stdout)).map_err(|e| {
            debug!("無法解析 ffprobe 輸出 {}: {e:#}", self.path.display());
            DecodeError::Unreadable {
                path: self.path.clone(),
            }
        })?;

        let metadata = VideoMetadata {
            frame_rate: info.frame_rate,
            frame_count: info.frame_count,
        };
        self.metadata = Some(metadata);
        Ok(metadata)
    }

    fn frame_at(&mut self, timestamp_seconds: f64) -> Result<Vec<u8>, DecodeError> {
        let (stdout, stderr, success) = self.run(self.frame_command(timestamp_seconds))?;

        if !success {
            return Err(DecodeError::FrameFailure {
                timestamp: timestamp_seconds,
                reason: stderr,
            });
        }
        if stdout.is_empty() {
            return Err(DecodeError::FrameFailure {
                timestamp: timestamp_seconds,
                reason: "ffmpeg 沒有輸出任何畫面".to_string(),
            });
        }

        Ok(stdout)
    }
}

impl Drop for FfmpegSession {
    fn drop(&mut self) {
        debug!("釋放解碼工作階段: {}", self.path.display());
    }
}
