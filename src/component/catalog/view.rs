use super::layout::WatchedDirectory;
use crate::component::decoder::Decoder;
use crate::component::qualification::qualify;
use crate::component::thumbnail_extractor::parse_thumbnail_offset;
use crate::tools::{format_length, scan_video_files};
use anyhow::Result;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering as CmpOrdering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 列表中的一部影片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub thumbnails: Vec<String>,
    pub length: String,
}

/// 監看資料夾的唯讀檢視，每次呼叫都重新讀取檔案系統
pub struct CatalogView<'a> {
    directory: &'a WatchedDirectory,
    decoder: &'a dyn Decoder,
}

impl<'a> CatalogView<'a> {
    pub fn new(directory: &'a WatchedDirectory, decoder: &'a dyn Decoder) -> Self {
        Self { directory, decoder }
    }

    /// 列出目前通過判定的影片，依檔名排序
    ///
    /// 已不符合門檻的影片（例如被外部截短）直接略過，即使檔案尚未被移除。
    pub fn list_videos(&self) -> Result<Vec<CatalogEntry>> {
        let video_files = scan_video_files(self.directory.root())?;

        let entries = video_files
            .par_iter()
            .filter_map(|path| self.entry_for(path))
            .collect();

        Ok(entries)
    }

    fn entry_for(&self, video_path: &Path) -> Option<CatalogEntry> {
        let name = video_path.file_name()?.to_string_lossy().to_string();
        let size_bytes = fs::metadata(video_path).ok()?.len();
        let cancel_signal = Arc::new(AtomicBool::new(false));

        let qualification = match qualify(self.decoder, video_path, size_bytes, &cancel_signal) {
            Ok(qualification) => qualification,
            Err(e) => {
                warn!("無法判定影片 {name}: {e}");
                return None;
            }
        };

        if !qualification.verdict.is_keep() {
            debug!("列表略過 {name}: {:?}", qualification.verdict);
            return None;
        }

        Some(CatalogEntry {
            thumbnails: list_thumbnails(&self.directory.thumbnail_dir_for(video_path)),
            length: format_length(qualification.duration_seconds),
            name,
        })
    }
}

/// 列出縮圖資料夾中的 JPEG 檔名
///
/// `thumbnail_<秒數>.jpg` 依秒數排序，其他 JPEG 依檔名排在後面；
/// 資料夾不存在時回傳空列表。
#[must_use]
pub fn list_thumbnails(thumbnail_dir: &Path) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(thumbnail_dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = read_dir
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| is_jpeg_name(name))
        .collect();

    names.sort_by(|a, b| compare_thumbnail_names(a, b));
    names
}

fn is_jpeg_name(name: &str) -> bool {
    PathBuf::from(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"))
}

fn compare_thumbnail_names(a: &str, b: &str) -> CmpOrdering {
    match (parse_thumbnail_offset(a), parse_thumbnail_offset(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => a.cmp(b),
    }
}
