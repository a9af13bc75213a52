//! Single test outcome scraped from a log line.

use std::{fmt, path::Path};

use crate::prelude::*;

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TryFrom<&str> for TestStatus {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "PASS" => Ok(TestStatus::Pass),
            "FAIL" => Ok(TestStatus::Fail),
            _ => Err(Error::InvalidStatus(String::from(value))),
        }
    }
}

impl From<TestStatus> for &'static str {
    fn from(value: TestStatus) -> Self {
        match value {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: &str = (*self).into();
        write!(f, "{value}")
    }
}

/// One test, as reported by a `--- PASS` or `--- FAIL` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    /// Test name, including the `Parent/Child` path of sub-tests.
    pub name: String,
    /// Suite name shared by every result of a run.
    pub class_name: String,
    /// Elapsed seconds, exactly as printed in the log (e.g. `1.23`).
    pub elapsed: String,
    /// Pass or fail.
    pub status: TestStatus,
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}.{} ({}s)",
            self.status, self.class_name, self.name, self.elapsed
        )
    }
}

/// Suite name for a test script: its file name up to the first `.`.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use prow_report::class_name;
///
/// assert_eq!(class_name(Path::new("hack/jenkins/linux_integration_tests_kvm.sh")), "linux_integration_tests_kvm");
/// assert_eq!(class_name(Path::new("e2e.test.sh")), "e2e");
/// ```
pub fn class_name(script: &Path) -> String {
    script
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(String::from))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keywords() -> Result<()> {
        assert_eq!(TestStatus::try_from("PASS")?, TestStatus::Pass);
        assert_eq!(TestStatus::try_from("FAIL")?, TestStatus::Fail);
        assert!(TestStatus::try_from("SKIP").is_err());
        assert_eq!(TestStatus::Fail.to_string(), "FAIL");
        Ok(())
    }

    #[test]
    fn class_name_strips_directories_and_extensions() {
        assert_eq!(class_name(Path::new("/tmp/minikube/test.sh")), "test");
        assert_eq!(class_name(Path::new("run")), "run");
        assert_eq!(class_name(Path::new("a.b.c")), "a");
        assert_eq!(class_name(Path::new("")), "");
    }
}
