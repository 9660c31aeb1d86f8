//! 資料夾監看元件
//!
//! 切換資料夾時掃描既有影片，之後依檔案系統事件送出新影片。

mod backlog;
mod event_settler;
mod main;

pub use backlog::{BacklogReport, scan_backlog};
pub use event_settler::{EventSettler, FileSignal, classify};
pub use main::{FolderWatcher, SharedDirectory};
