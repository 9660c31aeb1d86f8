use super::error::AttemptError;
use super::task::{IngestionTask, TaskOutcome};
use crate::component::catalog::remove_video_files;
use crate::component::decoder::Decoder;
use crate::component::qualification::{DiscardReason, Verdict, qualify};
use crate::component::thumbnail_extractor::{ExtractionReport, extract_thumbnails};
use crate::config::{ATTEMPT_TIMEOUT, MAX_ATTEMPTS};
use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// 逾時後等待被放棄的嘗試收尾的時間
const CANCEL_GRACE: Duration = Duration::from_secs(1);

/// 每次嘗試的時間上限與最多嘗試次數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorPolicy {
    pub attempt_timeout: Duration,
    pub max_attempts: u32,
    pub cancel_grace: Duration,
}

impl Default for SupervisorPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: ATTEMPT_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            cancel_grace: CANCEL_GRACE,
        }
    }
}

#[derive(Debug)]
enum AttemptOutcome {
    Kept(ExtractionReport),
    Discarded(DiscardReason),
    Vanished,
}

/// 處理監督者
///
/// 每次嘗試在獨立執行緒中執行並受時間上限約束。逾時的嘗試會收到取消訊號，
/// 但監督者不等待它結束就進入下一次嘗試；次數用盡後強制移除影片與縮圖。
pub struct ProcessingSupervisor {
    decoder: Arc<dyn Decoder>,
    policy: SupervisorPolicy,
}

impl ProcessingSupervisor {
    pub fn new(decoder: Arc<dyn Decoder>) -> Self {
        Self::with_policy(decoder, SupervisorPolicy::default())
    }

    pub fn with_policy(decoder: Arc<dyn Decoder>, policy: SupervisorPolicy) -> Self {
        Self { decoder, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &SupervisorPolicy {
        &self.policy
    }

    pub fn supervise(&self, task: &IngestionTask) -> TaskOutcome {
        let name = task.display_name();
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!("處理影片 {name}（第 {attempt}/{max_attempts} 次）");

            match self.run_with_budget(task) {
                Ok(AttemptOutcome::Kept(report)) => {
                    info!("影片 {name} 已保留，縮圖 {} 張", report.written());
                    return TaskOutcome::Kept {
                        frames_written: report.written(),
                        attempts: attempt,
                    };
                }
                Ok(AttemptOutcome::Discarded(reason)) => {
                    info!("影片 {name} 已捨棄: {reason}");
                    return TaskOutcome::Discarded {
                        reason,
                        attempts: attempt,
                    };
                }
                Ok(AttemptOutcome::Vanished) => {
                    info!("影片 {name} 已不存在，略過");
                    return TaskOutcome::Vanished { attempts: attempt };
                }
                Err(e) => {
                    warn!("處理影片 {name} 失敗（第 {attempt}/{max_attempts} 次）: {e}");
                }
            }
        }

        error!("影片 {name} 重試 {max_attempts} 次仍失敗，強制移除");
        if let Err(e) = remove_video_files(&task.video_path, &task.thumbnail_dir) {
            error!("強制移除 {name} 失敗: {e:#}");
        }

        TaskOutcome::RemovedAfterFailure {
            attempts: max_attempts,
        }
    }

    fn run_with_budget(&self, task: &IngestionTask) -> Result<AttemptOutcome, AttemptError> {
        let cancel_signal = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);

        let decoder = Arc::clone(&self.decoder);
        let attempt_task = task.clone();
        let attempt_cancel = Arc::clone(&cancel_signal);

        thread::Builder::new()
            .name("ingest-attempt".to_string())
            .spawn(move || {
                let result = run_attempt(decoder.as_ref(), &attempt_task, &attempt_cancel);
                let _ = result_tx.send(result);
            })
            .map_err(|e| AttemptError::Fault(format!("無法啟動處理執行緒: {e}")))?;

        match result_rx.recv_timeout(self.policy.attempt_timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                cancel_signal.store(true, Ordering::SeqCst);
                if result_rx.recv_timeout(self.policy.cancel_grace).is_err() {
                    warn!(
                        "影片 {} 的處理未在取消後結束，改為背景放棄",
                        task.display_name()
                    );
                }
                Err(AttemptError::Timeout(self.policy.attempt_timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(AttemptError::Fault("處理執行緒異常結束".to_string()))
            }
        }
    }
}

fn run_attempt(
    decoder: &dyn Decoder,
    task: &IngestionTask,
    cancel_signal: &Arc<AtomicBool>,
) -> Result<AttemptOutcome, AttemptError> {
    let size_bytes = match fs::metadata(&task.video_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            remove_video_files(&task.video_path, &task.thumbnail_dir)
                .map_err(AttemptError::Cleanup)?;
            return Ok(AttemptOutcome::Vanished);
        }
        Err(source) => {
            return Err(AttemptError::Filesystem {
                path: task.video_path.clone(),
                source,
            });
        }
    };

    let qualification = qualify(decoder, &task.video_path, size_bytes, cancel_signal)?;

    match qualification.verdict {
        Verdict::Discard(reason) => {
            remove_video_files(&task.video_path, &task.thumbnail_dir)
                .map_err(AttemptError::Cleanup)?;
            Ok(AttemptOutcome::Discarded(reason))
        }
        Verdict::Keep => {
            let report = extract_thumbnails(
                decoder,
                &task.video_path,
                &task.thumbnail_dir,
                cancel_signal,
            )?;
            Ok(AttemptOutcome::Kept(report))
        }
    }
}
