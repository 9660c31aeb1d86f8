//! 處理監督元件
//!
//! 狀態機：嘗試（判定 → 捨棄並清除 / 擷取縮圖）→ 完成；
//! 逾時或錯誤時重試，次數用盡則強制移除。
//!
//! 已知限制：解碼器若不理會取消訊號，被放棄的嘗試仍會在背景執行直到結束。
//! `FfmpegDecoder` 會在取消時終止子程序，因此不受此影響。

mod error;
mod main;
mod stats;
mod task;
mod worker_pool;

pub use error::AttemptError;
pub use main::{ProcessingSupervisor, SupervisorPolicy};
pub use stats::{PipelineStats, StatsSnapshot};
pub use task::{IngestionTask, TaskOutcome};
pub use worker_pool::{TaskSink, WorkerPool};
