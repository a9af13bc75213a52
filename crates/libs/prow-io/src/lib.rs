//! Process execution and output streaming for the prow CI tools.
//!
//! Spawns external programs, merges their stdout and stderr into a single
//! ordered stream of lines and optionally enforces a wall-clock timeout.
//!
//! # Usage
//!
//! ```rust,no_run
//! use prow_io::runner::{RunEvent, Runner};
//! use tokio::sync::mpsc::channel;
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = Runner::new("echo", vec!["Hello, World!"]);
//!     let (tx, mut rx) = channel(64);
//!
//!     let handle = tokio::spawn(async move { runner.run(tx).await });
//!
//!     while let Some(event) = rx.recv().await {
//!         match event {
//!             RunEvent::ProcessNewOutputLine(line) => println!("Output: {}", line),
//!             RunEvent::ProcessEnd(success) => println!("Process ended: {}", success),
//!             _ => {}
//!         }
//!     }
//!
//!     let exit_status = handle.await.unwrap();
//!     println!("{:?}", exit_status);
//! }
//! ```

pub mod process;
pub mod runner;
