//! Low-level async process management utilities.

use std::{
    ffi::OsStr,
    fs::File,
    io,
    os::fd::OwnedFd,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::{
    net::unix::pipe,
    process::{Child, Command},
};

/// How a waited-on process came to an end.
#[derive(Debug)]
pub enum ProcessStatus {
    /// Process has completed with exit status.
    Done(ExitStatus),
    /// Process outlived its deadline and was killed.
    TimedOut,
}

/// Spawn a new async process with piped stdout and stderr.
///
/// Stdin is closed so that scripts waiting on input fail fast instead of
/// blocking the run. The child is killed if its handle is dropped.
///
/// # Examples
///
/// ```rust
/// use prow_io::process::spawn_process;
///
/// #[tokio::main]
/// async fn main() {
///     let mut child = spawn_process("echo", &["Hello".to_string()]).unwrap();
///     let output = child.stdout.take().unwrap();
/// }
/// ```
pub fn spawn_process(cmd: &str, args: &[String]) -> Result<Child, io::Error> {
    Command::new(OsStr::new(cmd))
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Spawn a new async process whose stdout and stderr share a single pipe.
///
/// Returns the child and the read end of that pipe. Both streams go through
/// one kernel buffer, so lines are read back in the order the child wrote
/// them, as with a shell's `2>&1`.
///
/// # Examples
///
/// ```rust
/// use prow_io::process::spawn_merged_process;
/// use tokio::io::AsyncReadExt;
///
/// #[tokio::main]
/// async fn main() {
///     let args = ["-c".to_string(), "echo out; echo err >&2".to_string()];
///     let (mut child, mut output) = spawn_merged_process("sh", &args).unwrap();
///     child.wait().await.unwrap();
///
///     let mut text = String::new();
///     output.read_to_string(&mut text).await.unwrap();
///     assert_eq!(text, "out\nerr\n");
/// }
/// ```
pub fn spawn_merged_process(
    cmd: &str,
    args: &[String],
) -> Result<(Child, pipe::Receiver), io::Error> {
    let (reader, writer) = io::pipe()?;
    let child = {
        let mut command = Command::new(OsStr::new(cmd));
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);
        // Dropping `command` closes our copies of the write end, so the
        // reader sees EOF once the child and its descendants exit
        command.spawn()?
    };
    let reader = pipe::Receiver::from_file(File::from(OwnedFd::from(reader)))?;
    Ok((child, reader))
}

/// Asynchronously terminate a child process and reap it.
pub async fn stop_child(child: &mut Child) -> Result<(), io::Error> {
    child.kill().await
}

/// Asynchronously capture the exit status of a child process.
///
/// # Examples
///
/// ```rust
/// use prow_io::process::{spawn_process, capture_exit_status};
///
/// #[tokio::main]
/// async fn main() {
///     let mut child = spawn_process("echo", &["done".to_string()]).unwrap();
///     let exit_status = capture_exit_status(&mut child).await.unwrap();
///     assert!(exit_status.success());
/// }
/// ```
pub async fn capture_exit_status(child: &mut Child) -> Result<ExitStatus, io::Error> {
    child.wait().await
}

/// Wait for a child process, killing it once `timeout` elapses.
///
/// With no timeout this waits for as long as the child runs.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use prow_io::process::{spawn_process, wait_child, ProcessStatus};
///
/// #[tokio::main]
/// async fn main() {
///     let mut child = spawn_process("sleep", &["5".to_string()]).unwrap();
///     let status = wait_child(&mut child, Some(Duration::from_millis(50))).await.unwrap();
///     assert!(matches!(status, ProcessStatus::TimedOut));
/// }
/// ```
pub async fn wait_child(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<ProcessStatus, io::Error> {
    let Some(timeout) = timeout else {
        return capture_exit_status(child).await.map(ProcessStatus::Done);
    };

    match tokio::time::timeout(timeout, capture_exit_status(child)).await {
        Ok(exit_status) => exit_status.map(ProcessStatus::Done),
        Err(_) => {
            stop_child(child).await?;
            Ok(ProcessStatus::TimedOut)
        }
    }
}
