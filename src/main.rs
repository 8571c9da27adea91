mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process::ExitCode;

// 用例严格串行执行，单线程运行时即可
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 初始化日志系统
    loctest::logger::init_logger();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli::run(cli).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
