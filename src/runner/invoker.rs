use crate::Result;
use crate::error::LoctestError;
use crate::runner::types::Invocation;
use std::future::Future;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// 调用被测编译器的能力
///
/// 驱动器只依赖这个接口，测试中可以换成不启动进程的实现。
pub trait CompilerInvoker {
    /// 以 `source` 为唯一参数运行 `compiler`，超过 `timeout` 视为错误
    fn invoke(
        &self,
        compiler: &Path,
        source: &Path,
        timeout: Duration,
    ) -> impl Future<Output = Result<Invocation>> + Send;
}

/// 真实子进程实现
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }
}

impl CompilerInvoker for ProcessInvoker {
    async fn invoke(&self, compiler: &Path, source: &Path, timeout: Duration) -> Result<Invocation> {
        tracing::debug!(compiler = %compiler.display(), source = %source.display(), "spawning compiler");

        let child = Command::new(compiler)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| LoctestError::Spawn {
                compiler: compiler.to_path_buf(),
                err,
            })?;

        // 超时后 future 被丢弃，kill_on_drop 负责结束子进程
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(source = %source.display(), ?timeout, "compiler timed out, killed");
                return Err(LoctestError::Timeout {
                    compiler: compiler.to_path_buf(),
                    source_file: source.to_path_buf(),
                    timeout,
                });
            }
        };

        let exit_code = exit_code(output.status);
        tracing::debug!(source = %source.display(), exit_code, "compiler exited");

        Ok(Invocation {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// 被信号终止的进程返回负的信号编号
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
