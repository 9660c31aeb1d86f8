//! 影片目錄
//!
//! 檔案系統本身就是目錄：影片檔放在監看資料夾，縮圖放在 `thumbs/<主檔名>/`。
//! 沒有額外的中繼資料檔。

mod cleanup;
mod layout;
mod view;

pub use cleanup::{RemovalReport, remove_video_files};
pub use layout::WatchedDirectory;
pub use view::{CatalogEntry, CatalogView, list_thumbnails};
