use crate::runner::invoker::{CompilerInvoker, ProcessInvoker};
use crate::runner::types::{TestCase, TestResult};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct TestExecutor<I = ProcessInvoker> {
    invoker: I,
    compiler: PathBuf,
    timeout: Duration,
}

impl TestExecutor<ProcessInvoker> {
    pub fn new(compiler: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self::with_invoker(ProcessInvoker::new(), compiler, timeout)
    }
}

impl<I: CompilerInvoker> TestExecutor<I> {
    pub fn with_invoker(invoker: I, compiler: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            invoker,
            compiler: compiler.into(),
            timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn invoker(&self) -> &I {
        &self.invoker
    }

    /// 执行单个用例
    ///
    /// 所有错误（超时、无法启动、IO）都转换成该用例的 `Error` 结果，不会向上传播。
    pub async fn execute_one(&self, case: &TestCase) -> TestResult {
        // 开始计时
        let start = Instant::now();

        match self
            .invoker
            .invoke(&self.compiler, &case.path, self.timeout)
            .await
        {
            Ok(invocation) => TestResult::completed(case, invocation, start.elapsed()),
            Err(e) => {
                tracing::debug!(case = %case.name, error = %e, "case errored");
                TestResult::error(case, e.to_string(), start.elapsed())
            }
        }
    }
}
