pub mod load;
pub mod save;
pub mod types;

pub use types::{
    ATTEMPT_TIMEOUT, Config, Language, MAX_ATTEMPTS, MAX_RECENT_PATHS, MIN_VIDEO_DURATION_SECONDS,
    MIN_VIDEO_SIZE_BYTES, TASK_QUEUE_CAPACITY, THUMBNAIL_DIR_NAME, THUMBNAIL_INTERVAL_SECONDS,
    UserSettings, VIDEO_EXTENSIONS,
};
