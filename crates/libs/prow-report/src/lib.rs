//! Test result scraping and report writing for prow jobs.
//!
//! Turns the output of a Go-style test run into structured results and
//! writes the files testgrid reads from a results directory:
//!
//! ```text
//! <out_dir>/build_log.txt
//! <out_dir>/started.json
//! <out_dir>/finished.json
//! <out_dir>/artifacts/junit_runner.xml
//! ```
//!
//! # Usage
//!
//! ```rust
//! use prow_report::{Classifier, RunReport, TestStatus};
//!
//! let classifier = Classifier::for_script("hack/jenkins/linux_integration_tests.sh");
//! let mut report = RunReport::start(1_700_000_000);
//!
//! for line in ["=== RUN   TestStart", "--- PASS: TestStart (3.10s)"] {
//!     if let Some(result) = classifier.classify(line) {
//!         report.push(result);
//!     }
//! }
//!
//! let report = report.finish(1_700_000_100, Some(0));
//! assert_eq!(report.results()[0].status, TestStatus::Pass);
//! assert!(report.passed());
//! ```

pub mod classifier;
pub mod error;
pub mod junit;
pub mod prelude;
pub mod report;
pub mod results_dir;
pub mod test_result;

pub use classifier::Classifier;
pub use report::{FinalReport, FinishedRecord, Outcome, RunReport, StartedRecord, epoch_now};
pub use results_dir::{BuildLog, ResultsDir};
pub use test_result::{TestResult, TestStatus, class_name};
