use anyhow::Context;
use clap::Parser;
use loctest::config::{ConfigLoader, ConfigOverrides, DriverConfig};
use loctest::driver::Driver;
use loctest::runner::{JsonReport, TestReporter};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// 不带参数运行时使用驱动器目录下的 build/loc 与 examples/*.loc
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 项目根目录（默认为驱动器自身所在目录）
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// 编译产物目录（默认 <root>/build）
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// 测试用例目录（默认 <root>/examples）
    #[arg(long, value_name = "DIR")]
    pub examples_dir: Option<PathBuf>,

    /// 编译器可执行文件名（默认 loc）
    #[arg(long, value_name = "NAME")]
    pub compiler: Option<String>,

    /// 单个用例的超时秒数（默认 5）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// 显示耗时以及通过用例的 stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// 关闭彩色输出
    #[arg(long)]
    pub no_color: bool,

    /// 将结果另外写入 JSON 文件
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            build_dir: self.build_dir.clone(),
            examples_dir: self.examples_dir.clone(),
            compiler: self.compiler.clone(),
            timeout_secs: self.timeout,
        }
    }

    /// 默认值 < loctest.toml < 命令行
    pub fn load_config(&self) -> Result<DriverConfig> {
        let root = self.root.clone().unwrap_or_else(DriverConfig::default_root);
        let config = ConfigLoader::load(&root)
            .with_context(|| format!("failed to load config from {}", root.display()))?;
        Ok(config.apply_overrides(self.overrides())?)
    }
}

/// 运行整个测试集，返回进程退出码
pub async fn run(cli: Cli) -> Result<u8> {
    let config = cli.load_config()?;
    tracing::debug!(?config, "resolved configuration");

    let reporter = TestReporter::stdout(cli.verbose, !cli.no_color);
    let mut driver = Driver::new(config, reporter);
    let report = driver.run().await?;

    if let Some(path) = &cli.report {
        JsonReport::new(&report.results, &report.summary)
            .write_to(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    Ok(report.summary.exit_status())
}
