use crate::config::VIDEO_EXTENSIONS;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 判斷檔名是否為允許的影片副檔名（不分大小寫）
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// 列出資料夾第一層的影片檔（不遞迴，依檔名排序）
pub fn scan_video_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut video_files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("無法讀取資料夾內容: {}", directory.display()))?;

        if entry.file_type().is_file() && is_video_file(entry.path()) {
            video_files.push(entry.into_path());
        }
    }

    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_video_file_case_insensitive() {
        assert!(is_video_file(Path::new("/a/movie.mp4")));
        assert!(is_video_file(Path::new("/a/movie.MP4")));
        assert!(is_video_file(Path::new("/a/stream.Ts")));
        assert!(!is_video_file(Path::new("/a/movie.mkv")));
        assert!(!is_video_file(Path::new("/a/mp4")));
        assert!(!is_video_file(Path::new("/a/thumbnail_0.jpg")));
    }

    #[test]
    fn test_scan_video_files_is_flat_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.mp4"), "x").unwrap();
        fs::write(dir.path().join("a.TS"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir_all(dir.path().join("thumbs").join("nested")).unwrap();
        fs::write(dir.path().join("thumbs").join("nested").join("c.mp4"), "x").unwrap();
        fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let files = scan_video_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.TS", "b.mp4"]);
    }
}
