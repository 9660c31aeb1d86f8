use crate::component::decoder::DecodeError;
use crate::component::thumbnail_extractor::ExtractError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 單次處理嘗試失敗的原因；所有種類都會觸發重試
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("無法讀取影片資訊 {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("清除失敗: {0:#}")]
    Cleanup(anyhow::Error),

    #[error("處理逾時（超過 {0:?}）")]
    Timeout(Duration),

    #[error("處理發生未預期錯誤: {0}")]
    Fault(String),
}
