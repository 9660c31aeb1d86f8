use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// ffprobe 回報的幀率與總幀數（未經驗證，可能為 0 或負值）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame_rate: f64,
    pub frame_count: i64,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

/// 建立查詢幀率與幀數的 ffprobe 命令
#[must_use]
pub fn ffprobe_command(path: &Path) -> Command {
    let mut command = Command::new("ffprobe");
    command
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path);
    command
}

/// 解析 ffprobe 的 JSON 輸出
///
/// 幀數優先使用 `nb_frames`，缺少時（例如 MPEG-TS）以長度乘上幀率推算。
pub fn parse_frame_info(json: &str) -> Result<FrameInfo> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow::anyhow!("找不到視訊串流"))?;

    let frame_rate = [&video_stream.r_frame_rate, &video_stream.avg_frame_rate]
        .into_iter()
        .filter_map(|rate| rate.as_deref().and_then(parse_frame_rate))
        .find(|rate| *rate > 0.0)
        .unwrap_or(0.0);

    let frame_count = video_stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .or_else(|| {
            let duration = video_stream
                .duration
                .as_ref()
                .or(probe.format.as_ref().and_then(|f| f.duration.as_ref()))
                .and_then(|d| d.parse::<f64>().ok())?;
            Some((duration * frame_rate).round() as i64)
        })
        .unwrap_or(0);

    Ok(FrameInfo {
        frame_rate,
        frame_count,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
