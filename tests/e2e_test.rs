//! 端對端測試 - 使用 ffmpeg 產生的真實影片
//!
//! 系統未安裝 ffmpeg / ffprobe 時略過。

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use auto_video_catalog::component::catalog::{CatalogView, WatchedDirectory};
use auto_video_catalog::component::decoder::{Decoder, FfmpegDecoder};
use auto_video_catalog::component::qualification::probe_duration;
use auto_video_catalog::component::supervisor::{ProcessingSupervisor, TaskOutcome};
use auto_video_catalog::config::MIN_VIDEO_SIZE_BYTES;
use tempfile::TempDir;

fn generate_video(path: &Path, seconds: u32) -> bool {
    let status = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
        .arg("testsrc2=size=640x360:rate=10")
        .args(["-t", &seconds.to_string()])
        .args(["-c:v", "mpeg4", "-q:v", "1", "-g", "10"])
        .arg(path)
        .status();
    status.is_ok_and(|s| s.success())
}

/// 測試 1: 真實影片的長度與縮圖擷取
#[test]
fn test_ffmpeg_pipeline_e2e() {
    if FfmpegDecoder::check_available().is_err() {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    }

    let dir = TempDir::new().unwrap();
    let video = dir.path().join("sample.mp4");
    if !generate_video(&video, 310) {
        println!("跳過測試：無法產生測試影片");
        return;
    }
    let size = fs::metadata(&video).unwrap().len();
    if size < MIN_VIDEO_SIZE_BYTES {
        println!("跳過測試：產生的影片只有 {size} bytes");
        return;
    }

    let decoder = Arc::new(FfmpegDecoder::default());
    let cancel_signal = Arc::new(AtomicBool::new(false));
    let duration = probe_duration(decoder.as_ref(), &video, &cancel_signal)
        .unwrap()
        .expect("應能取得長度");
    assert!((duration - 310.0).abs() < 0.5, "長度應約為 310 秒: {duration}");

    let watched = WatchedDirectory::new(dir.path());
    let task = watched.task_for(&video);
    let supervisor = ProcessingSupervisor::new(Arc::clone(&decoder) as Arc<dyn Decoder>);

    let outcome = supervisor.supervise(&task);

    assert_eq!(
        outcome,
        TaskOutcome::Kept {
            frames_written: 3,
            attempts: 1
        }
    );
    for offset in [0, 120, 240] {
        let thumbnail = task.thumbnail_dir.join(format!("thumbnail_{offset}.jpg"));
        let bytes = fs::read(&thumbnail).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]), "{} 應為 JPEG", thumbnail.display());
    }

    let entries = CatalogView::new(&watched, decoder.as_ref()).list_videos().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].length, "00:05:10");
    assert_eq!(entries[0].thumbnails.len(), 3);

    println!("✓ ffmpeg 端對端測試通過");
}

/// 測試 2: 無法解碼的檔案被判定為長度未知並移除
#[test]
fn test_ffmpeg_garbage_file_is_discarded() {
    if FfmpegDecoder::check_available().is_err() {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    }

    let dir = TempDir::new().unwrap();
    let video = dir.path().join("garbage.ts");
    fs::write(&video, vec![0x42_u8; 3 * 1024 * 1024]).unwrap();

    let watched = WatchedDirectory::new(dir.path());
    let supervisor = ProcessingSupervisor::new(Arc::new(FfmpegDecoder::default()));

    let outcome = supervisor.supervise(&watched.task_for(&video));

    assert!(
        matches!(outcome, TaskOutcome::Discarded { .. }),
        "無法解碼的檔案應被捨棄: {outcome:?}"
    );
    assert!(!video.exists());
}
