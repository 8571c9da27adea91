use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// 用例类型，由文件名在发现阶段决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// 期望编译器接受（退出码为 0）
    Positive,
    /// 期望编译器拒绝（退出码非 0）
    Negative,
}

impl TestKind {
    pub fn from_name(name: &str, negative_prefix: &str) -> Self {
        if name.starts_with(negative_prefix) {
            TestKind::Negative
        } else {
            TestKind::Positive
        }
    }
}

/// 单个测试用例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// 用例文件路径
    pub path: PathBuf,

    /// 文件名（不含目录）
    pub name: String,

    pub kind: TestKind,
}

impl TestCase {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, kind: TestKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
        }
    }
}

/// 一次编译器调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// 用例的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// 正向用例，编译成功
    Passed,
    /// 反向用例，编译按预期失败
    ExpectedFailure { exit_code: i32 },
    /// 反向用例，编译却成功了
    UnexpectedSuccess,
    /// 正向用例，编译失败
    Failed { exit_code: i32 },
    /// 超时或无法执行编译器
    Error(String),
}

impl CaseOutcome {
    /// 按文件名约定判定一次调用
    pub fn classify(kind: TestKind, invocation: &Invocation) -> Self {
        let accepted = invocation.exit_code == 0;
        match (kind, accepted) {
            (TestKind::Positive, true) => CaseOutcome::Passed,
            (TestKind::Positive, false) => CaseOutcome::Failed {
                exit_code: invocation.exit_code,
            },
            (TestKind::Negative, false) => CaseOutcome::ExpectedFailure {
                exit_code: invocation.exit_code,
            },
            (TestKind::Negative, true) => CaseOutcome::UnexpectedSuccess,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Passed | CaseOutcome::ExpectedFailure { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CaseOutcome::Error(_))
    }

    /// 编译器实际的退出码；超时或无法启动时为 `None`
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CaseOutcome::Passed | CaseOutcome::UnexpectedSuccess => Some(0),
            CaseOutcome::ExpectedFailure { exit_code } | CaseOutcome::Failed { exit_code } => {
                Some(*exit_code)
            }
            CaseOutcome::Error(_) => None,
        }
    }

    /// JSON 报告中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "passed",
            CaseOutcome::ExpectedFailure { .. } => "expected_failure",
            CaseOutcome::UnexpectedSuccess => "unexpected_success",
            CaseOutcome::Failed { .. } => "failed",
            CaseOutcome::Error(_) => "error",
        }
    }
}

/// 单个用例的执行结果
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,

    pub kind: TestKind,

    pub outcome: CaseOutcome,

    /// 执行耗时
    pub duration: Duration,

    /// 编译器的 stdout（出错时为空）
    pub stdout: String,

    /// 编译器的 stderr（出错时为空）
    pub stderr: String,
}

impl TestResult {
    pub fn completed(case: &TestCase, invocation: Invocation, duration: Duration) -> Self {
        Self {
            name: case.name.clone(),
            kind: case.kind,
            outcome: CaseOutcome::classify(case.kind, &invocation),
            duration,
            stdout: invocation.stdout,
            stderr: invocation.stderr,
        }
    }

    pub fn error(case: &TestCase, error: String, duration: Duration) -> Self {
        Self {
            name: case.name.clone(),
            kind: case.kind,
            outcome: CaseOutcome::Error(error),
            duration,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_pass()
    }
}

/// 测试摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration: Duration,
}

impl TestSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        let errors = results.iter().filter(|r| r.outcome.is_error()).count();
        let total_duration = results.iter().map(|r| r.duration).sum();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed - errors,
            errors,
            total_duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// 进程退出码：全部通过为 0，否则为 1
    pub fn exit_status(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }
}
