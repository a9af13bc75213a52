//! JUnit XML for testgrid.
//!
//! The document has a single `<testsuite>` root:
//!
//! ```xml
//! <testsuite failures="1" tests="2">
//! <testcase classname="integration" name="TestStart" time="1.5"></testcase>
//! <testcase classname="integration" name="TestStop" time="2"><failure message="Test Failed" /></testcase>
//! </testsuite>
//! ```

use std::{io::Write, sync::LazyLock};

use regex::Regex;

use crate::{
    prelude::*,
    test_result::{TestResult, TestStatus},
};

static SUITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<testsuite failures="(\d+)" tests="(\d+)">"#).expect("suite pattern is valid")
});

static CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<testcase classname="([^"]*)" name="([^"]*)" time="([^"]*)">(.*?)</testcase>"#,
    )
    .expect("testcase pattern is valid")
});

/// A JUnit document read back into results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunitSuite {
    /// The `failures` attribute.
    pub failures: usize,
    /// The `tests` attribute.
    pub tests: usize,
    pub cases: Vec<TestResult>,
}

/// Write `results` as a JUnit `<testsuite>` document.
pub fn write_testsuite<W: Write>(results: &[TestResult], mut writer: W) -> Result<()> {
    let failures = results
        .iter()
        .filter(|result| result.status == TestStatus::Fail)
        .count();

    writeln!(
        writer,
        r#"<testsuite failures="{}" tests="{}">"#,
        failures,
        results.len()
    )?;
    for result in results {
        write!(
            writer,
            r#"<testcase classname="{}" name="{}" time="{}">"#,
            escape(&result.class_name),
            escape(&result.name),
            escape(&result.elapsed)
        )?;
        if result.status == TestStatus::Fail {
            write!(writer, r#"<failure message="Test Failed" />"#)?;
        }
        writeln!(writer, "</testcase>")?;
    }
    write!(writer, "</testsuite>")?;
    Ok(())
}

/// Read a document produced by [`write_testsuite`].
pub fn parse_testsuite(document: &str) -> Result<JunitSuite> {
    let suite = SUITE
        .captures(document)
        .ok_or_else(|| Error::MalformedJunit(String::from("missing <testsuite> element")))?;
    let failures = suite[1]
        .parse::<usize>()
        .map_err(|_| Error::MalformedJunit(format!("bad failures count {}", &suite[1])))?;
    let tests = suite[2]
        .parse::<usize>()
        .map_err(|_| Error::MalformedJunit(format!("bad tests count {}", &suite[2])))?;

    let cases = CASE
        .captures_iter(document)
        .map(|case| TestResult {
            class_name: unescape(&case[1]),
            name: unescape(&case[2]),
            elapsed: unescape(&case[3]),
            status: if case[4].contains("<failure") {
                TestStatus::Fail
            } else {
                TestStatus::Pass
            },
        })
        .collect();

    Ok(JunitSuite {
        failures,
        tests,
        cases,
    })
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, elapsed: &str, status: TestStatus) -> TestResult {
        TestResult {
            name: String::from(name),
            class_name: String::from("linux_integration_tests_docker"),
            elapsed: String::from(elapsed),
            status,
        }
    }

    fn render(results: &[TestResult]) -> Result<String> {
        let mut buffer = Vec::new();
        write_testsuite(results, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    #[test]
    fn exact_document() -> Result<()> {
        let document = render(&[
            result("A", "1", TestStatus::Pass),
            result("B", "2", TestStatus::Fail),
        ])?;
        assert_eq!(
            document,
            "<testsuite failures=\"1\" tests=\"2\">\n\
             <testcase classname=\"linux_integration_tests_docker\" name=\"A\" time=\"1\"></testcase>\n\
             <testcase classname=\"linux_integration_tests_docker\" name=\"B\" time=\"2\"><failure message=\"Test Failed\" /></testcase>\n\
             </testsuite>"
        );
        Ok(())
    }

    #[test]
    fn empty_suite() -> Result<()> {
        let document = render(&[])?;
        assert_eq!(document, "<testsuite failures=\"0\" tests=\"0\">\n</testsuite>");
        let suite = parse_testsuite(&document)?;
        assert_eq!((suite.failures, suite.tests), (0, 0));
        assert!(suite.cases.is_empty());
        Ok(())
    }

    #[test]
    fn each_failure_adds_a_failure_element() -> Result<()> {
        let mut results = vec![result("Ok", "0.1", TestStatus::Pass)];
        let before = parse_testsuite(&render(&results)?)?;

        results.push(result("Baz", "0.50", TestStatus::Fail));
        let document = render(&results)?;
        let after = parse_testsuite(&document)?;

        assert_eq!(after.failures, before.failures + 1);
        assert_eq!(document.matches("<failure ").count(), 1);
        assert!(document.contains(
            r#"name="Baz" time="0.50"><failure message="Test Failed" /></testcase>"#
        ));
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let results = vec![
            result("TestFunctional", "42.87", TestStatus::Pass),
            result("TestFunctional/Status", "2.33", TestStatus::Pass),
            result("TestFunctional/Mount<9p>", "0.50", TestStatus::Fail),
            result("TestQuote\"&'", "0", TestStatus::Fail),
        ];
        let suite = parse_testsuite(&render(&results)?)?;
        assert_eq!(suite.tests, 4);
        assert_eq!(suite.failures, 2);
        assert_eq!(suite.cases, results);
        Ok(())
    }

    #[test]
    fn parse_rejects_other_documents() {
        assert!(matches!(
            parse_testsuite("<testsuites></testsuites>"),
            Err(Error::MalformedJunit(_))
        ));
    }
}
