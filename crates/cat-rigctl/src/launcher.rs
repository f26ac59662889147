//! Bounded process launcher
//!
//! Every radio operation runs a short-lived control program. The launcher
//! waits a bounded time for it to exit. A program that is still running when
//! the wait expires is handed back to the caller instead of being killed, so
//! the same routine can start a long-lived daemon in the background.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::error::RigError;

/// What happened to a launched program within the wait bound
#[derive(Debug)]
pub enum Launch {
    /// The program exited and its output was collected
    Exited(Output),
    /// The program was still running when the wait expired
    StillRunning(Child),
}

/// How the launched program's output streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pipe stdout and stderr back to the caller
    Capture,
    /// Send both streams to the null device (for background daemons)
    Discard,
}

/// Launch `program` with `args` and wait up to `timeout` for it to exit
pub async fn launch(
    program: &str,
    args: &[String],
    timeout: Duration,
    output: OutputMode,
) -> Result<Launch, RigError> {
    debug!("Launching {} {}", program, args.join(" "));

    let (stdout, stderr) = match output {
        OutputMode::Capture => (Stdio::piped(), Stdio::piped()),
        OutputMode::Discard => (Stdio::null(), Stdio::null()),
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|e| RigError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let mut out_pipe = child.stdout.take();
    let mut err_pipe = child.stderr.take();

    let collected = tokio::time::timeout(timeout, async {
        let (out, err) = tokio::join!(drain(out_pipe.as_mut()), drain(err_pipe.as_mut()));
        let status = child.wait().await?;
        Ok::<_, std::io::Error>(Output {
            status,
            stdout: out?,
            stderr: err?,
        })
    })
    .await;

    match collected {
        Ok(result) => {
            let output = result?;
            trace!(
                "{} exited with {} ({} bytes of output)",
                program,
                output.status,
                output.stdout.len()
            );
            Ok(Launch::Exited(output))
        }
        Err(_) => {
            debug!(
                "{} still running after {}ms",
                program,
                timeout.as_millis()
            );
            Ok(Launch::StillRunning(child))
        }
    }
}

/// Read a pipe to end, treating an absent pipe as empty
async fn drain<R>(pipe: Option<&mut R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quick_program_exits() {
        let launch = launch(
            "echo",
            &["14250000".to_string()],
            Duration::from_secs(5),
            OutputMode::Capture,
        )
        .await
        .unwrap();

        match launch {
            Launch::Exited(output) => {
                assert!(output.status.success());
                assert_eq!(String::from_utf8_lossy(&output.stdout), "14250000\n");
            }
            Launch::StillRunning(_) => panic!("echo should have exited"),
        }
    }

    #[tokio::test]
    async fn test_slow_program_is_left_running() {
        let launch = launch(
            "sleep",
            &["5".to_string()],
            Duration::from_millis(50),
            OutputMode::Discard,
        )
        .await
        .unwrap();

        match launch {
            Launch::StillRunning(mut child) => {
                assert!(child.try_wait().unwrap().is_none());
                child.kill().await.unwrap();
            }
            Launch::Exited(_) => panic!("sleep should still be running"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let result = launch(
            "definitely-not-a-rigctl-binary",
            &[],
            Duration::from_millis(100),
            OutputMode::Capture,
        )
        .await;

        assert!(matches!(result, Err(RigError::Spawn { .. })));
    }
}
