//! 影片縮圖擷取元件
//!
//! 每兩分鐘擷取一張畫面，寫入該影片的縮圖資料夾。
//! 單張失敗只記錄並繼續，部分成功不視為錯誤。

mod main;
mod timestamp_selector;

pub use main::{ExtractError, ExtractionReport, extract_thumbnails};
pub use timestamp_selector::{extraction_timestamps, parse_thumbnail_offset, thumbnail_file_name};
