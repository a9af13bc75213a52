//! Run-level report: timestamps, exit status and collected results.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::test_result::{TestResult, TestStatus};

/// Overall result of a run as written to `finished.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Success,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// Contents of `started.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Contents of `finished.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub passed: bool,
    pub result: Outcome,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Current time in seconds since the Unix epoch.
pub fn epoch_now() -> i64 {
    Utc::now().timestamp()
}

/// A run in progress. Results are appended in the order they are seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    started_at: i64,
    results: Vec<TestResult>,
}

impl RunReport {
    /// Begin a run at `started_at` (epoch seconds).
    pub fn start(started_at: i64) -> Self {
        Self {
            started_at,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Close the run.
    ///
    /// `exit_code` is the test script's exit code; `None` when the script
    /// was killed (timeout, signal) and never produced one.
    pub fn finish(self, finished_at: i64, exit_code: Option<i32>) -> FinalReport {
        FinalReport {
            started_at: self.started_at,
            finished_at,
            exit_code,
            results: self.results,
        }
    }
}

/// A finished run, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    started_at: i64,
    finished_at: i64,
    exit_code: Option<i32>,
    results: Vec<TestResult>,
}

impl FinalReport {
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn finished_at(&self) -> i64 {
        self.finished_at
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// `Success` iff the script exited with code 0. Individual test failures
    /// do not change the outcome; the exit code already reflects them.
    pub fn outcome(&self) -> Outcome {
        match self.exit_code {
            Some(0) => Outcome::Success,
            _ => Outcome::Fail,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome() == Outcome::Success
    }

    /// Number of results with status `FAIL`.
    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.status == TestStatus::Fail)
            .count()
    }

    pub fn started_record(&self) -> StartedRecord {
        StartedRecord {
            timestamp: self.started_at,
        }
    }

    pub fn finished_record(&self) -> FinishedRecord {
        FinishedRecord {
            timestamp: self.finished_at,
            passed: self.passed(),
            result: self.outcome(),
            metadata: Map::new(),
        }
    }
}
