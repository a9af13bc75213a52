//! High-level process runner with event handling.

use std::{process::ExitStatus, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::mpsc::Sender,
    task::JoinHandle,
};
use tracing::{error, warn};

use crate::process::{ProcessStatus, spawn_merged_process, spawn_process, wait_child};

/// Events emitted during process execution.
#[derive(Debug, PartialEq)]
pub enum RunEvent {
    /// Process creation failed with error message.
    ProcessCreationFailed(String),
    /// Process was successfully created.
    ProcessCreated,
    /// New output line from the process. Carries stderr lines too unless the
    /// runner was built [`with_separate_stderr`](Runner::with_separate_stderr).
    /// The trailing newline is stripped.
    ProcessNewOutputLine(String),
    /// New stderr line, only emitted when stderr is kept separate.
    ProcessNewErrorLine(String),
    /// Process was killed after running for longer than the given timeout.
    ProcessTimedOut(Duration),
    /// Process ended (true = success, false = failure).
    ProcessEnd(bool),
}

/// High-level process runner with event-driven output handling.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Command to execute.
    command: String,
    /// Command line arguments.
    args: Vec<String>,
    /// Optional wall-clock limit for the whole run.
    timeout: Option<Duration>,
    /// Whether stderr shares the stdout pipe.
    merge_stderr: bool,
}

impl Runner {
    /// Create a new runner with command and arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prow_io::runner::Runner;
    ///
    /// let runner = Runner::new("ls", vec!["-la", "/tmp"]);
    /// ```
    pub fn new(command: impl Into<String>, args: Vec<impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(|a| a.into()).collect(),
            timeout: None,
            merge_stderr: true,
        }
    }

    /// Create a new runner with just a command (no arguments).
    pub fn new_without_args(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout: None,
            merge_stderr: true,
        }
    }

    /// Kill the process if it is still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read stderr from its own pipe and report it as
    /// [`RunEvent::ProcessNewErrorLine`]. Ordering between the two streams is
    /// then lost.
    pub fn with_separate_stderr(mut self) -> Self {
        self.merge_stderr = false;
        self
    }

    /// Get the full command string with arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prow_io::runner::Runner;
    ///
    /// let runner = Runner::new("ls", vec!["-la"]);
    /// assert_eq!(runner.get_full_command(), "ls -la");
    /// ```
    pub fn get_full_command(&self) -> String {
        if self.args.is_empty() {
            return self.command.clone();
        }
        format!("{} {}", &self.command, &self.args.join(" "))
    }

    async fn read_stream<T: AsyncRead + Unpin>(
        tx: Sender<RunEvent>,
        stream: T,
        event: fn(String) -> RunEvent,
    ) {
        let mut reader = BufReader::new(stream);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let data = String::from_utf8_lossy(&buffer);
                    let line = data.trim_end_matches(&['\n', '\r'][..]).to_string();
                    if tx.send(event(line)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("Failed to read process output - {err}");
                    break;
                }
            }
        }
    }

    fn launch_stream_reader<T>(
        tx: Sender<RunEvent>,
        stream: T,
        event: fn(String) -> RunEvent,
    ) -> JoinHandle<()>
    where
        T: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(Runner::read_stream(tx, stream, event))
    }

    /// Run the process with event monitoring.
    ///
    /// Starts the process and forwards every output line through `tx`, in
    /// the order the process wrote it. Returns once the process has ended
    /// and its output is drained. `None` means there is no exit status: the
    /// process could not be spawned, could not be waited on, or was killed
    /// after its timeout.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prow_io::runner::{Runner, RunEvent};
    /// use tokio::sync::mpsc::channel;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let runner = Runner::new("echo", vec!["Hello"]);
    ///     let (tx, mut rx) = channel(16);
    ///
    ///     let exit_status = runner.run(tx).await;
    ///     assert!(exit_status.unwrap().success());
    ///     assert_eq!(rx.recv().await, Some(RunEvent::ProcessCreated));
    /// }
    /// ```
    pub async fn run(&self, tx: Sender<RunEvent>) -> Option<ExitStatus> {
        let spawned = if self.merge_stderr {
            spawn_merged_process(&self.command, &self.args)
                .map(|(process, output)| (process, Some(output)))
        } else {
            spawn_process(&self.command, &self.args).map(|process| (process, None))
        };
        let (mut process, merged_output) = match spawned {
            Ok(spawned) => spawned,
            Err(err) => {
                let _ = tx
                    .send(RunEvent::ProcessCreationFailed(format!(
                        "{}: {err}",
                        self.get_full_command()
                    )))
                    .await;
                return None;
            }
        };

        let _ = tx.send(RunEvent::ProcessCreated).await;

        let readers: Vec<JoinHandle<()>> = match merged_output {
            Some(output) => vec![Runner::launch_stream_reader(
                tx.clone(),
                output,
                RunEvent::ProcessNewOutputLine,
            )],
            None => [
                process.stdout.take().map(|stdout| {
                    Runner::launch_stream_reader(
                        tx.clone(),
                        stdout,
                        RunEvent::ProcessNewOutputLine,
                    )
                }),
                process.stderr.take().map(|stderr| {
                    Runner::launch_stream_reader(
                        tx.clone(),
                        stderr,
                        RunEvent::ProcessNewErrorLine,
                    )
                }),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };

        let exit_status = match wait_child(&mut process, self.timeout).await {
            Ok(ProcessStatus::Done(status)) => Some(status),
            Ok(ProcessStatus::TimedOut) => {
                let _ = tx
                    .send(RunEvent::ProcessTimedOut(self.timeout.unwrap_or_default()))
                    .await;
                // Grandchildren may still hold the pipes open
                for reader in &readers {
                    reader.abort();
                }
                None
            }
            Err(err) => {
                error!("Failed to wait for {} - {err}", self.get_full_command());
                None
            }
        };

        for reader in readers {
            let _ = reader.await;
        }

        let success = exit_status.is_some_and(|status| status.success());
        let _ = tx.send(RunEvent::ProcessEnd(success)).await;
        exit_status
    }
}

#[cfg(test)]
mod test {
    use ntest::timeout;
    use tokio::sync::mpsc::{Receiver, channel};

    use super::*;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Couldn't build runtime")
            .block_on(future)
    }

    async fn collect(mut rx: Receiver<RunEvent>) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    async fn launch_program(runner: Runner) -> (Option<ExitStatus>, Vec<RunEvent>) {
        let (tx, rx) = channel(16);
        let handle = tokio::spawn(async move { runner.run(tx).await });
        let events = collect(rx).await;
        let exit = handle.await.expect("Couldn't join runner task");
        (exit, events)
    }

    fn output_lines(events: &[RunEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match event {
                RunEvent::ProcessNewOutputLine(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    #[timeout(5000)]
    fn test_stdout_lines_in_order() {
        let runner = Runner::new("sh", vec!["-c", "echo one; echo two; printf three"]);
        let (exit, events) = block_on(launch_program(runner));

        assert!(exit.expect("Couldn't get child exit status").success());
        assert_eq!(events.first(), Some(&RunEvent::ProcessCreated));
        assert_eq!(events.last(), Some(&RunEvent::ProcessEnd(true)));
        assert_eq!(output_lines(&events), vec!["one", "two", "three"]);
    }

    #[test]
    #[timeout(5000)]
    fn test_stderr_is_merged_in_write_order() {
        let script = "for i in 1 2 3 4 5 6 7 8 9 10; do echo out$i; echo err$i >&2; done";
        let runner = Runner::new("sh", vec!["-c", script]);
        let (_, events) = block_on(launch_program(runner));

        let expected: Vec<String> = (1..=10)
            .flat_map(|i| [format!("out{i}"), format!("err{i}")])
            .collect();
        assert_eq!(output_lines(&events), expected);
    }

    #[test]
    #[timeout(5000)]
    fn test_separate_stderr() {
        let runner =
            Runner::new("sh", vec!["-c", "echo out; echo err >&2"]).with_separate_stderr();
        let (exit, events) = block_on(launch_program(runner));

        assert!(exit.expect("Couldn't get child exit status").success());
        assert_eq!(output_lines(&events), vec!["out"]);
        assert!(events.contains(&RunEvent::ProcessNewErrorLine(String::from("err"))));
    }

    #[test]
    #[timeout(5000)]
    fn test_exit_code_is_propagated() {
        let runner = Runner::new("sh", vec!["-c", "echo failing; exit 3"]);
        let (exit, events) = block_on(launch_program(runner));

        let exit = exit.expect("Couldn't get child exit status");
        assert_eq!(exit.code(), Some(3));
        assert_eq!(events.last(), Some(&RunEvent::ProcessEnd(false)));
    }

    #[test]
    #[timeout(5000)]
    fn test_timeout_kills_process() {
        let runner = Runner::new("sh", vec!["-c", "echo started; sleep 30"])
            .with_timeout(Some(Duration::from_millis(300)));
        let (exit, events) = block_on(launch_program(runner));

        assert!(exit.is_none());
        assert!(events.contains(&RunEvent::ProcessTimedOut(Duration::from_millis(300))));
        assert_eq!(events.last(), Some(&RunEvent::ProcessEnd(false)));
    }

    #[test]
    #[timeout(5000)]
    fn test_spawn_failure() {
        let runner = Runner::new_without_args("./this-program-does-not-exist");
        let (exit, events) = block_on(launch_program(runner));

        assert!(exit.is_none());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RunEvent::ProcessCreationFailed(_)));
    }

    #[test]
    fn test_full_command() {
        assert_eq!(Runner::new_without_args("pwd").get_full_command(), "pwd");
        assert_eq!(
            Runner::new("bash", vec!["-x", "test.sh"]).get_full_command(),
            "bash -x test.sh"
        );
    }
}
