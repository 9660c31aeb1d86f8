//! 處理管線控制器

mod controller;

pub use controller::{PipelineController, PipelineOptions};
