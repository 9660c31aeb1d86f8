//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod catalog;
pub mod decoder;
pub mod folder_watcher;
pub mod pipeline;
pub mod qualification;
pub mod supervisor;
pub mod thumbnail_extractor;

pub use catalog::{CatalogEntry, CatalogView, WatchedDirectory};
pub use decoder::{Decoder, FfmpegDecoder};
pub use folder_watcher::FolderWatcher;
pub use pipeline::{PipelineController, PipelineOptions};
pub use supervisor::{ProcessingSupervisor, WorkerPool};
