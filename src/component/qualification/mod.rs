//! 影片保留判定
//!
//! 擷取流程與目錄列表共用同一組門檻，避免兩處判斷不一致。

mod gate;

pub use gate::{DiscardReason, Qualification, Verdict, decide, probe_duration, qualify};
