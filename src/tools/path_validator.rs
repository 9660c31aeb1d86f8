use anyhow::{Context, Result};
use std::path::Path;

/// 建立資料夾；已存在時視為成功（多個來源可能同時建立同一個資料夾）
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    Ok(())
}

/// 檢查由外部傳入的名稱是否為單純的檔名（不含路徑分隔符號或上層目錄）
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_exists_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("thumbs").join("movie");

        ensure_directory_exists(&target).unwrap();
        ensure_directory_exists(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_is_plain_file_name() {
        assert!(is_plain_file_name("movie.mp4"));
        assert!(is_plain_file_name("thumbnail_120.jpg"));
        assert!(!is_plain_file_name("../secret.mp4"));
        assert!(!is_plain_file_name("sub/movie.mp4"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
