use super::main::ProcessingSupervisor;
use super::stats::{PipelineStats, StatsSnapshot};
use super::task::IngestionTask;
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, SendError, Sender};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// 接收處理工作的對象
pub trait TaskSink: Send + Sync {
    /// 送出工作；重複或已停止時回傳 `false`
    fn submit(&self, task: IngestionTask) -> bool;
}

/// 固定數量的處理執行緒加上有界佇列
///
/// 佇列已滿時 `submit` 會阻塞（背壓）。同一影片已在佇列中或處理中時，
/// 重複送出的工作會被略過。
pub struct WorkerPool {
    sender: Mutex<Option<Sender<IngestionTask>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    stats: Arc<PipelineStats>,
}

impl WorkerPool {
    pub fn new(
        supervisor: Arc<ProcessingSupervisor>,
        worker_count: usize,
        queue_capacity: usize,
    ) -> Result<Self> {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = crossbeam_channel::bounded(queue_capacity.max(1));
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let stats = Arc::new(PipelineStats::default());

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let receiver = receiver.clone();
            let supervisor = Arc::clone(&supervisor);
            let in_flight = Arc::clone(&in_flight);
            let stats = Arc::clone(&stats);

            let handle = thread::Builder::new()
                .name(format!("ingest-worker-{index}"))
                .spawn(move || worker_loop(&receiver, &supervisor, &in_flight, &stats))
                .context("無法啟動處理執行緒")?;
            workers.push(handle);
        }

        info!("啟動 {worker_count} 個處理執行緒，佇列容量 {queue_capacity}");

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            in_flight,
            stats,
        })
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// 佇列中與處理中的工作數
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// 停止接收新工作，等待佇列清空後結束所有執行緒
    pub fn shutdown(&self) {
        if lock(&self.sender).take().is_none() {
            return;
        }

        let workers: Vec<_> = lock(&self.workers).drain(..).collect();
        info!("等待 {} 個處理執行緒結束...", workers.len());
        for worker in workers {
            if worker.join().is_err() {
                warn!("處理執行緒異常結束");
            }
        }
    }
}

impl TaskSink for WorkerPool {
    fn submit(&self, task: IngestionTask) -> bool {
        let Some(sender) = lock(&self.sender).clone() else {
            warn!("處理佇列已停止，略過 {}", task.display_name());
            return false;
        };

        if !lock(&self.in_flight).insert(task.video_path.clone()) {
            debug!("影片已在處理中，略過重複工作: {}", task.display_name());
            self.stats.record_duplicate();
            return false;
        }

        self.stats.record_submitted();
        if let Err(SendError(task)) = sender.send(task) {
            lock(&self.in_flight).remove(&task.video_path);
            return false;
        }
        true
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    receiver: &Receiver<IngestionTask>,
    supervisor: &ProcessingSupervisor,
    in_flight: &Mutex<HashSet<PathBuf>>,
    stats: &PipelineStats,
) {
    for task in receiver.iter() {
        let outcome = supervisor.supervise(&task);
        stats.record(&outcome);
        lock(in_flight).remove(&task.video_path);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
