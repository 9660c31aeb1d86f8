use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 外部程序的執行結果
#[derive(Debug)]
pub enum ProcessOutcome {
    Finished {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: String,
    },
    /// 取消訊號觸發，程序已被終止
    Cancelled,
    /// 超過時限，程序已被終止
    TimedOut,
}

/// 執行外部命令，期間持續檢查取消訊號與時限
///
/// stdout/stderr 由獨立執行緒讀取，避免管線緩衝區塞滿造成子程序卡住。
pub fn run_cancellable(
    mut command: Command,
    cancel_signal: &AtomicBool,
    deadline: Duration,
) -> io::Result<ProcessOutcome> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);
    let started = Instant::now();

    let interrupted = loop {
        match child.try_wait() {
            Ok(Some(_)) => break None,
            Ok(None) => {}
            Err(e) => {
                kill_child(&mut child);
                return Err(e);
            }
        }

        if cancel_signal.load(Ordering::SeqCst) {
            break Some(ProcessOutcome::Cancelled);
        }
        if started.elapsed() >= deadline {
            break Some(ProcessOutcome::TimedOut);
        }

        thread::sleep(POLL_INTERVAL);
    };

    if let Some(outcome) = interrupted {
        kill_child(&mut child);
        collect(stdout_reader);
        collect(stderr_reader);
        return Ok(outcome);
    }

    let status = child.wait()?;
    let stdout = collect(stdout_reader);
    let stderr = String::from_utf8_lossy(&collect(stderr_reader))
        .trim()
        .to_string();

    Ok(ProcessOutcome::Finished {
        status,
        stdout,
        stderr,
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default()
}

fn kill_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_cancellable_collects_stdout() {
        let mut command = Command::new("sh");
        command.args(["-c", "printf hello"]);

        let cancel = AtomicBool::new(false);
        let outcome = run_cancellable(command, &cancel, Duration::from_secs(5)).unwrap();

        match outcome {
            ProcessOutcome::Finished { status, stdout, .. } => {
                assert!(status.success());
                assert_eq!(stdout, b"hello");
            }
            other => panic!("預期程序正常結束，實際為 {other:?}"),
        }
    }

    #[test]
    fn test_run_cancellable_times_out() {
        let mut command = Command::new("sleep");
        command.arg("10");

        let cancel = AtomicBool::new(false);
        let started = Instant::now();
        let outcome = run_cancellable(command, &cancel, Duration::from_millis(200)).unwrap();

        assert!(matches!(outcome, ProcessOutcome::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(5), "逾時後應立即終止程序");
    }

    #[test]
    fn test_run_cancellable_honours_cancel_signal() {
        let mut command = Command::new("sleep");
        command.arg("10");

        let cancel = AtomicBool::new(true);
        let outcome = run_cancellable(command, &cancel, Duration::from_secs(30)).unwrap();

        assert!(matches!(outcome, ProcessOutcome::Cancelled));
    }
}
