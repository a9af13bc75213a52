//! On-disk layout of a results directory.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use crate::{junit::write_testsuite, prelude::*, report::FinalReport};

pub const ARTIFACTS_DIR: &str = "artifacts";
pub const BUILD_LOG_FILE: &str = "build_log.txt";
pub const STARTED_FILE: &str = "started.json";
pub const FINISHED_FILE: &str = "finished.json";
pub const JUNIT_FILE: &str = "junit_runner.xml";

/// Results directory handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsDir {
    root: PathBuf,
}

impl ResultsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifacts_path(&self) -> PathBuf {
        self.root.join(ARTIFACTS_DIR)
    }

    pub fn build_log_path(&self) -> PathBuf {
        self.root.join(BUILD_LOG_FILE)
    }

    pub fn started_path(&self) -> PathBuf {
        self.root.join(STARTED_FILE)
    }

    pub fn finished_path(&self) -> PathBuf {
        self.root.join(FINISHED_FILE)
    }

    pub fn junit_path(&self) -> PathBuf {
        self.artifacts_path().join(JUNIT_FILE)
    }

    /// Create the directory and its `artifacts/` subdirectory.
    /// Existing directories are kept as they are.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.artifacts_path())?;
        Ok(())
    }

    /// Truncate and open `build_log.txt`.
    pub fn create_build_log(&self) -> Result<BuildLog> {
        let file = File::create(self.build_log_path())?;
        Ok(BuildLog {
            writer: BufWriter::new(file),
        })
    }

    /// Write the JUnit document and both status files.
    pub fn write_report(&self, report: &FinalReport) -> Result<()> {
        {
            let mut writer = BufWriter::new(File::create(self.junit_path())?);
            write_testsuite(report.results(), &mut writer)?;
            writer.flush()?;
        }
        write_json(&self.started_path(), &report.started_record())?;
        write_json(&self.finished_path(), &report.finished_record())?;

        info!(
            "Wrote {} results ({} failed) to {}",
            report.results().len(),
            report.failures(),
            self.root.display()
        );
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Line-oriented writer for the raw script output.
#[derive(Debug)]
pub struct BuildLog {
    writer: BufWriter<File>,
}

impl BuildLog {
    pub fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Flush buffered lines. Dropping the log without calling this still
    /// flushes, but swallows the error.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        junit::parse_testsuite,
        report::{FinishedRecord, Outcome, RunReport, StartedRecord},
        test_result::{TestResult, TestStatus},
    };

    use super::*;

    fn finished_report() -> FinalReport {
        let mut report = RunReport::start(100);
        for (name, status) in [("A", TestStatus::Pass), ("B", TestStatus::Fail)] {
            report.push(TestResult {
                name: String::from(name),
                class_name: String::from("stub"),
                elapsed: String::from("1"),
                status,
            });
        }
        report.finish(160, Some(1))
    }

    #[test]
    fn prepare_creates_artifacts_in_existing_dir() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = ResultsDir::new(tmp.path());
        assert!(!dir.artifacts_path().exists());
        dir.prepare()?;
        assert!(dir.artifacts_path().is_dir());
        // idempotent
        dir.prepare()?;
        Ok(())
    }

    #[test]
    fn write_report_layout() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = ResultsDir::new(tmp.path().join("gcs_out"));
        dir.prepare()?;
        dir.write_report(&finished_report())?;

        let started: StartedRecord =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("gcs_out/started.json"))?)?;
        assert_eq!(started.timestamp, 100);

        let finished: FinishedRecord =
            serde_json::from_str(&fs::read_to_string(dir.finished_path())?)?;
        assert_eq!(finished.timestamp, 160);
        assert!(!finished.passed);
        assert_eq!(finished.result, Outcome::Fail);

        let junit = fs::read_to_string(tmp.path().join("gcs_out/artifacts/junit_runner.xml"))?;
        let suite = parse_testsuite(&junit)?;
        assert_eq!((suite.tests, suite.failures), (2, 1));
        Ok(())
    }

    #[test]
    fn write_report_without_prepare_fails() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = ResultsDir::new(tmp.path().join("missing"));
        assert!(matches!(
            dir.write_report(&finished_report()),
            Err(Error::IO(_))
        ));
        Ok(())
    }

    #[test]
    fn build_log_lines() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = ResultsDir::new(tmp.path());
        let mut log = dir.create_build_log()?;
        log.append("+ make integration")?;
        log.append("--- PASS: TestStart (1s)")?;
        log.finish()?;
        assert_eq!(
            fs::read_to_string(dir.build_log_path())?,
            "+ make integration\n--- PASS: TestStart (1s)\n"
        );
        Ok(())
    }
}
