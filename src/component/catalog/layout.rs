use crate::component::supervisor::IngestionTask;
use crate::config::THUMBNAIL_DIR_NAME;
use std::path::{Path, PathBuf};

/// 目前監看的資料夾與其縮圖根目錄
///
/// 目錄結構：`<root>/<影片>`、`<root>/thumbs/<影片主檔名>/thumbnail_<秒數>.jpg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedDirectory {
    root: PathBuf,
    thumbs_root: PathBuf,
}

impl WatchedDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let thumbs_root = root.join(THUMBNAIL_DIR_NAME);
        Self { root, thumbs_root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn thumbs_root(&self) -> &Path {
        &self.thumbs_root
    }

    #[must_use]
    pub fn video_path(&self, video_name: &str) -> PathBuf {
        self.root.join(video_name)
    }

    /// 縮圖資料夾以影片主檔名（去除副檔名）命名
    #[must_use]
    pub fn thumbnail_dir_for(&self, video_path: &Path) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map_or_else(|| video_path.as_os_str().to_owned(), ToOwned::to_owned);
        self.thumbs_root.join(stem)
    }

    #[must_use]
    pub fn thumbnail_dir_for_name(&self, video_name: &str) -> PathBuf {
        self.thumbnail_dir_for(Path::new(video_name))
    }

    /// 路徑是否直接位於監看資料夾之下
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.parent().is_some_and(|parent| parent == self.root)
    }

    #[must_use]
    pub fn task_for(&self, video_path: &Path) -> IngestionTask {
        IngestionTask {
            video_path: video_path.to_path_buf(),
            thumbnail_dir: self.thumbnail_dir_for(video_path),
        }
    }
}
