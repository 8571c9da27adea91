use crate::Result;
use crate::runner::types::{CaseOutcome, TestKind, TestResult, TestSummary};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const SEPARATOR_WIDTH: usize = 40;

pub struct TestReporter<W = io::Stdout> {
    out: W,
    verbose: bool,
    color: bool,
}

impl TestReporter<io::Stdout> {
    pub fn stdout(verbose: bool, color: bool) -> Self {
        Self::new(io::stdout(), verbose, color)
    }
}

impl<W: Write> TestReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self {
            out,
            verbose,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// 打印测试开始
    pub fn print_header(&mut self, total: usize, examples_dir: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "Found {} test cases in {}\n",
            total,
            examples_dir.display()
        )
    }

    /// 在调用编译器之前输出用例名，立即刷新以便实时看到进度
    pub fn print_start(&mut self, name: &str) -> io::Result<()> {
        write!(self.out, "Running {}... ", name)?;
        self.out.flush()
    }

    /// 打印单个测试结果
    pub fn print_result(&mut self, result: &TestResult) -> io::Result<()> {
        let status = match &result.outcome {
            CaseOutcome::Passed => self.paint("PASSED", |s| s.green()),
            CaseOutcome::ExpectedFailure { .. } => {
                self.paint("PASSED (Expected Failure)", |s| s.green())
            }
            CaseOutcome::UnexpectedSuccess => {
                self.paint("FAILED (Unexpected Success)", |s| s.red())
            }
            CaseOutcome::Failed { exit_code } => {
                self.paint(&format!("FAILED (Exit Code {})", exit_code), |s| s.red())
            }
            CaseOutcome::Error(msg) => {
                format!("{}: {}", self.paint("ERROR", |s| s.red().bold()), msg)
            }
        };

        if self.verbose {
            let timing = self.paint(
                &format!("({}ms)", result.duration.as_millis()),
                |s| s.dimmed(),
            );
            writeln!(self.out, "{} {}", status, timing)?;
        } else {
            writeln!(self.out, "{}", status)?;
        }

        // 意外失败总是显示 stderr；verbose 模式下其他用例的输出也显示
        if matches!(result.outcome, CaseOutcome::Failed { .. }) {
            writeln!(self.out, "stderr: {}", result.stderr)?;
        } else if self.verbose {
            if !result.stdout.is_empty() {
                writeln!(self.out, "stdout: {}", result.stdout)?;
            }
            if !result.stderr.is_empty() {
                writeln!(self.out, "stderr: {}", result.stderr)?;
            }
        }

        Ok(())
    }

    /// 打印测试摘要
    pub fn print_summary(&mut self, summary: &TestSummary) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))?;

        let counts = format!("{}/{}", summary.passed, summary.total);
        let counts = if summary.all_passed() {
            self.paint(&counts, |s| s.green())
        } else {
            self.paint(&counts, |s| s.red())
        };
        writeln!(self.out, "Summary: {} tests passed.", counts)?;

        if self.verbose {
            writeln!(
                self.out,
                "{} failed, {} errors, {:.3}s",
                summary.failed,
                summary.errors,
                summary.total_duration.as_secs_f64()
            )?;
        }

        self.out.flush()
    }
}

/// `--report` 输出的 JSON 结构
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total: usize,
    pub duration_ms: u64,
    pub cases: Vec<JsonCase<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonCase<'a> {
    pub name: &'a str,
    pub kind: TestKind,
    pub outcome: &'static str,
    pub exit_code: Option<i32>,
    /// 超时或无法启动时的错误信息
    pub message: Option<&'a str>,
    pub stdout: Option<&'a str>,
    pub stderr: Option<&'a str>,
    pub duration_ms: u64,
}

impl<'a> JsonReport<'a> {
    pub fn new(results: &'a [TestResult], summary: &TestSummary) -> Self {
        let cases = results
            .iter()
            .map(|r| {
                let message = match &r.outcome {
                    CaseOutcome::Error(msg) => Some(msg.as_str()),
                    _ => None,
                };
                JsonCase {
                    name: &r.name,
                    kind: r.kind,
                    outcome: r.outcome.label(),
                    exit_code: r.outcome.exit_code(),
                    message,
                    stdout: non_empty(&r.stdout),
                    stderr: non_empty(&r.stderr),
                    duration_ms: millis(r.duration),
                }
            })
            .collect();

        Self {
            passed: summary.passed,
            failed: summary.failed,
            errors: summary.errors,
            total: summary.total,
            duration_ms: millis(summary.total_duration),
            cases,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "wrote json report");
        Ok(())
    }
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() { None } else { Some(text) }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
