use crate::Result;
use crate::error::LoctestError;
use crate::runner::types::{TestCase, TestKind};
use std::fs;
use std::path::Path;

/// 列出目录中所有以 `suffix` 结尾的条目，按文件名排序
///
/// 目录本身无法读取时返回错误；空目录返回空列表。
pub fn discover(dir: &Path, suffix: &str, negative_prefix: &str) -> Result<Vec<TestCase>> {
    let entries = fs::read_dir(dir).map_err(|err| LoctestError::ExamplesDir {
        path: dir.to_path_buf(),
        err,
    })?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(suffix) {
            continue;
        }

        let kind = TestKind::from_name(&name, negative_prefix);
        cases.push(TestCase::new(entry.path(), name, kind));
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), count = cases.len(), "discovered test cases");

    Ok(cases)
}
