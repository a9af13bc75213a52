//! Log line classification.
//!
//! Go's test runner reports every finished test, sub-tests included, on a
//! line of the form:
//!
//! ```text
//! --- PASS: TestFunctional (42.87s)
//!     --- PASS: TestFunctional/Status (2.33s)
//!     --- FAIL: TestFunctional/Mounting (0.50s)
//! ```
//!
//! Each such line becomes one flat [`TestResult`]; nesting is not tracked.

use std::{path::Path, sync::LazyLock};

use regex::Regex;
use tracing::warn;

use crate::test_result::{TestResult, TestStatus, class_name};

const PASS_MARKER: &str = "--- PASS";
const FAIL_MARKER: &str = "--- FAIL";

static RESULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--- (PASS|FAIL): ([^ ]+) \(([0-9.]+)s\)").expect("result line pattern is valid")
});

/// Turns output lines into test results for one script.
#[derive(Debug, Clone)]
pub struct Classifier {
    class_name: String,
}

impl Classifier {
    /// Create a classifier labelling every result with `class_name`.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    /// Create a classifier labelled after a test script's file name.
    pub fn for_script(script: impl AsRef<Path>) -> Self {
        Self::new(class_name(script.as_ref()))
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Classify a single output line.
    ///
    /// Returns `None` for ordinary output. A line carrying a marker but not
    /// the full `--- STATUS: name (secs)` shape is skipped with a warning.
    pub fn classify(&self, line: &str) -> Option<TestResult> {
        if !line.contains(PASS_MARKER) && !line.contains(FAIL_MARKER) {
            return None;
        }

        let Some(captures) = RESULT_LINE.captures(line) else {
            warn!("Skipping malformed result line: {}", line.trim());
            return None;
        };

        let status = TestStatus::try_from(&captures[1]).ok()?;
        Some(TestResult {
            name: captures[2].to_string(),
            class_name: self.class_name.clone(),
            elapsed: captures[3].to_string(),
            status,
        })
    }
}
