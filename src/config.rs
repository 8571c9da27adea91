use crate::Result;
use crate::error::LoctestError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_EXAMPLES_DIR: &str = "examples";
pub const DEFAULT_COMPILER: &str = "loc";
pub const DEFAULT_SUFFIX: &str = ".loc";
pub const DEFAULT_NEGATIVE_PREFIX: &str = "fail";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 驱动器运行配置
///
/// 所有路径在构造时已解析完毕，驱动器本身不再读取环境或全局状态。
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// 项目根目录
    pub root: PathBuf,

    /// 编译产物目录，被测编译器位于其中
    pub build_dir: PathBuf,

    /// 测试用例目录
    pub examples_dir: PathBuf,

    /// 被测编译器的可执行文件名
    pub compiler: String,

    /// 测试用例文件后缀
    pub suffix: String,

    /// 反向用例（期望编译失败）的文件名前缀
    pub negative_prefix: String,

    /// 单个用例的超时时间
    pub timeout: Duration,
}

impl DriverConfig {
    /// 以给定根目录构造默认配置：`<root>/build/loc` 与 `<root>/examples/*.loc`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            build_dir: root.join(DEFAULT_BUILD_DIR),
            examples_dir: root.join(DEFAULT_EXAMPLES_DIR),
            root,
            compiler: DEFAULT_COMPILER.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            negative_prefix: DEFAULT_NEGATIVE_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 驱动器自身所在目录
    pub fn default_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// 被测编译器的完整路径
    pub fn compiler_path(&self) -> PathBuf {
        self.build_dir.join(&self.compiler)
    }

    /// 合并配置文件中的设置，相对路径基于根目录解析
    pub fn apply_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(dir) = file.build_dir {
            self.build_dir = self.root.join(dir);
        }
        if let Some(dir) = file.examples_dir {
            self.examples_dir = self.root.join(dir);
        }
        if let Some(compiler) = file.compiler {
            self.compiler = compiler;
        }
        if let Some(suffix) = file.suffix {
            self.suffix = suffix;
        }
        if let Some(prefix) = file.negative_prefix {
            self.negative_prefix = prefix;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = parse_timeout(secs)?;
        }
        Ok(self)
    }

    /// 合并命令行覆盖项（优先级最高）
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(dir) = overrides.build_dir {
            self.build_dir = dir;
        }
        if let Some(dir) = overrides.examples_dir {
            self.examples_dir = dir;
        }
        if let Some(compiler) = overrides.compiler {
            self.compiler = compiler;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = parse_timeout(secs)?;
        }
        Ok(self)
    }
}

fn parse_timeout(secs: f64) -> Result<Duration> {
    if secs <= 0.0 {
        return Err(LoctestError::ConfigError(format!(
            "timeout must be positive, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| LoctestError::ConfigError(format!("invalid timeout {}: {}", secs, e)))
}

/// `loctest.toml` 的内容，所有字段可选
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub build_dir: Option<PathBuf>,
    pub examples_dir: Option<PathBuf>,
    pub compiler: Option<String>,
    pub suffix: Option<String>,
    pub negative_prefix: Option<String>,
    pub timeout_secs: Option<f64>,
}

/// 命令行传入的覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub build_dir: Option<PathBuf>,
    pub examples_dir: Option<PathBuf>,
    pub compiler: Option<String>,
    pub timeout_secs: Option<f64>,
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "loctest.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// 构造根目录下的配置：默认值，再叠加 `<root>/loctest.toml`（如果存在）
    pub fn load(root: impl Into<PathBuf>) -> Result<DriverConfig> {
        let config = DriverConfig::with_root(root);
        let config_path = config.root.join(Self::CONFIG_FILE);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(config);
        }

        tracing::debug!(path = %config_path.display(), "loading config file");
        let file = Self::load_from_path(&config_path)?;
        config.apply_file(file)
    }
}
