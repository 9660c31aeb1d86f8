mod cpu_monitor;
mod ffprobe_info;
mod path_validator;
mod process_runner;
mod time_format;
mod video_scanner;

pub use cpu_monitor::{default_worker_count, resolve_worker_count};
pub use ffprobe_info::{FrameInfo, ffprobe_command, parse_frame_info};
pub use path_validator::{ensure_directory_exists, is_plain_file_name};
pub use process_runner::{ProcessOutcome, run_cancellable};
pub use time_format::{UNKNOWN_LENGTH, format_length};
pub use video_scanner::{is_video_file, scan_video_files};
