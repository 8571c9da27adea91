use crate::Result;
use crate::config::DriverConfig;
use crate::error::LoctestError;
use crate::runner::{
    CompilerInvoker, ProcessInvoker, TestExecutor, TestReporter, TestResult, TestSummary, discover,
};
use std::io::{self, Write};
use std::path::PathBuf;

/// 一次完整运行的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub results: Vec<TestResult>,
    pub summary: TestSummary,
}

/// 测试驱动器
///
/// 运行流程：检查编译器 → 发现用例 → 逐个执行 → 打印摘要。
/// 编译器缺失或用例目录不可读时直接返回错误，不执行任何用例。
pub struct Driver<I = ProcessInvoker, W = io::Stdout> {
    config: DriverConfig,
    executor: TestExecutor<I>,
    reporter: TestReporter<W>,
}

impl<W: Write> Driver<ProcessInvoker, W> {
    pub fn new(config: DriverConfig, reporter: TestReporter<W>) -> Self {
        Self::with_invoker(config, ProcessInvoker::new(), reporter)
    }
}

impl<I: CompilerInvoker, W: Write> Driver<I, W> {
    pub fn with_invoker(config: DriverConfig, invoker: I, reporter: TestReporter<W>) -> Self {
        let executor = TestExecutor::with_invoker(invoker, config.compiler_path(), config.timeout);
        Self {
            config,
            executor,
            reporter,
        }
    }

    pub fn into_reporter(self) -> TestReporter<W> {
        self.reporter
    }

    /// 确认被测编译器存在
    pub fn check_compiler(&self) -> Result<PathBuf> {
        let path = self.config.compiler_path();
        if !path.exists() {
            return Err(LoctestError::CompilerNotFound(path));
        }
        Ok(path)
    }

    pub async fn run(&mut self) -> Result<RunReport> {
        let compiler = self.check_compiler()?;
        tracing::info!(compiler = %compiler.display(), "compiler found");

        let cases = discover(
            &self.config.examples_dir,
            &self.config.suffix,
            &self.config.negative_prefix,
        )?;

        self.reporter
            .print_header(cases.len(), &self.config.examples_dir)?;

        let mut results = Vec::with_capacity(cases.len());
        for case in &cases {
            self.reporter.print_start(&case.name)?;
            let result = self.executor.execute_one(case).await;
            self.reporter.print_result(&result)?;
            results.push(result);
        }

        let summary = TestSummary::from_results(&results);
        self.reporter.print_summary(&summary)?;
        tracing::info!(
            passed = summary.passed,
            total = summary.total,
            "run finished"
        );

        Ok(RunReport { results, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CaseOutcome, Invocation};
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Clone)]
    enum Fake {
        Exit(i32, &'static str),
        Hang,
    }

    /// 按文件名返回预设结果，并记录调用顺序
    #[derive(Default)]
    struct FakeInvoker {
        responses: HashMap<String, Fake>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeInvoker {
        fn with(mut self, name: &str, fake: Fake) -> Self {
            self.responses.insert(name.to_string(), fake);
            self
        }
    }

    impl CompilerInvoker for FakeInvoker {
        async fn invoke(
            &self,
            compiler: &Path,
            source: &Path,
            timeout: Duration,
        ) -> Result<Invocation> {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.calls.lock().unwrap().push(name.clone());

            match self.responses.get(&name).cloned().unwrap_or(Fake::Exit(0, "")) {
                Fake::Exit(exit_code, stderr) => Ok(Invocation {
                    exit_code,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                }),
                Fake::Hang => Err(LoctestError::Timeout {
                    compiler: compiler.to_path_buf(),
                    source_file: source.to_path_buf(),
                    timeout,
                }),
            }
        }
    }

    /// 建立 `<root>/build/loc` 与 `<root>/examples/<files>`
    fn project(files: &[&str], with_compiler: bool) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("build")).unwrap();
        fs::create_dir_all(temp_dir.path().join("examples")).unwrap();
        if with_compiler {
            fs::write(temp_dir.path().join("build/loc"), "").unwrap();
        }
        for file in files {
            fs::write(temp_dir.path().join("examples").join(file), "").unwrap();
        }
        temp_dir
    }

    async fn run(
        root: &Path,
        invoker: FakeInvoker,
    ) -> (Result<RunReport>, String, Vec<String>) {
        let reporter = TestReporter::new(Vec::new(), false, false);
        let mut driver = Driver::with_invoker(DriverConfig::with_root(root), invoker, reporter);
        let report = driver.run().await;
        let calls = driver.executor_calls();
        let output = String::from_utf8(driver.into_reporter().into_inner()).unwrap();
        (report, output, calls)
    }

    impl<W: Write> Driver<FakeInvoker, W> {
        fn executor_calls(&self) -> Vec<String> {
            self.executor.invoker().calls.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_scenario_positive_and_negative_pass() {
        let root = project(&["ok_basic.loc", "fail_syntax.loc"], true);
        let invoker = FakeInvoker::default().with("fail_syntax.loc", Fake::Exit(1, "syntax error"));

        let (report, output, calls) = run(root.path(), invoker).await;
        let report = report.unwrap();

        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.exit_status(), 0);
        // 按文件名排序执行
        assert_eq!(calls, vec!["fail_syntax.loc", "ok_basic.loc"]);
        assert!(output.contains("Running fail_syntax.loc... PASSED (Expected Failure)\n"));
        assert!(output.contains("Running ok_basic.loc... PASSED\n"));
        assert!(output.ends_with("Summary: 2/2 tests passed.\n"));
    }

    #[tokio::test]
    async fn test_scenario_unexpected_failure() {
        let root = project(&["ok_basic.loc"], true);
        let invoker = FakeInvoker::default().with("ok_basic.loc", Fake::Exit(1, "undefined name x"));

        let (report, output, _) = run(root.path(), invoker).await;
        let report = report.unwrap();

        assert_eq!(report.summary.passed, 0);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.exit_status(), 1);
        assert!(output.contains("Running ok_basic.loc... FAILED (Exit Code 1)\nstderr: undefined name x\n"));
        assert!(output.ends_with("Summary: 0/1 tests passed.\n"));
    }

    #[tokio::test]
    async fn test_scenario_unexpected_success() {
        let root = project(&["fail_bad.loc"], true);

        let (report, output, _) = run(root.path(), FakeInvoker::default()).await;
        let report = report.unwrap();

        assert_eq!(report.results[0].outcome, CaseOutcome::UnexpectedSuccess);
        assert_eq!(report.summary.exit_status(), 1);
        assert!(output.contains("Running fail_bad.loc... FAILED (Unexpected Success)\n"));
        assert!(output.ends_with("Summary: 0/1 tests passed.\n"));
    }

    #[tokio::test]
    async fn test_missing_compiler_aborts() {
        let root = project(&["ok_basic.loc", "fail_syntax.loc"], false);

        let (report, output, calls) = run(root.path(), FakeInvoker::default()).await;

        match report {
            Err(LoctestError::CompilerNotFound(path)) => {
                assert_eq!(path, root.path().join("build/loc"))
            }
            other => panic!("Expected CompilerNotFound, got {:?}", other.map(|r| r.summary)),
        }
        assert!(calls.is_empty());
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_empty_corpus_is_success() {
        let root = project(&["notes.txt"], true);

        let (report, output, calls) = run(root.path(), FakeInvoker::default()).await;
        let report = report.unwrap();

        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.exit_status(), 0);
        assert!(calls.is_empty());
        assert!(output.ends_with("Summary: 0/0 tests passed.\n"));
    }

    #[tokio::test]
    async fn test_timeout_does_not_stop_run() {
        let root = project(&["a.loc", "b_slow.loc", "c.loc"], true);
        let invoker = FakeInvoker::default().with("b_slow.loc", Fake::Hang);

        let (report, output, calls) = run(root.path(), invoker).await;
        let report = report.unwrap();

        assert_eq!(calls, vec!["a.loc", "b_slow.loc", "c.loc"]);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.errors, 1);
        assert!(output.contains("Running b_slow.loc... ERROR: Command '"));
        assert!(output.contains("timed out after 5 seconds\n"));
        assert!(output.ends_with("Summary: 2/3 tests passed.\n"));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let root = project(&["ok.loc", "fail_a.loc", "fail_b.loc", "z.loc"], true);
        let make = || {
            FakeInvoker::default()
                .with("fail_a.loc", Fake::Exit(2, "rejected"))
                .with("z.loc", Fake::Exit(1, "crash"))
        };

        let (first, first_output, _) = run(root.path(), make()).await;
        let (second, second_output, _) = run(root.path(), make()).await;

        let first: Vec<CaseOutcome> = first.unwrap().results.into_iter().map(|r| r.outcome).collect();
        let second: Vec<CaseOutcome> =
            second.unwrap().results.into_iter().map(|r| r.outcome).collect();
        assert_eq!(first, second);
        assert_eq!(first_output, second_output);
    }
}
