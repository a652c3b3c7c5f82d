// src/main.rs

use clap::{ArgAction, Parser};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use slang::{Driver, EXIT_VALID, Report};
use std::path::PathBuf;

/// Static verifier for s-lang source files
#[derive(Parser, Debug)]
#[command(name = "slang", version, about)]
struct Cli {
    /// s-lang source file to verify
    path: PathBuf,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print a JSON report instead of the bare exit code
    #[arg(long)]
    json: bool,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    // 1. 解析参数
    let cli = Cli::parse();

    // 2. 初始化日志 (输出到 stderr，stdout 只留给结果)
    if let Err(e) = SimpleLogger::new()
        .with_level(level_for(cli.verbose))
        .env()
        .init()
    {
        eprintln!("Warning: logger unavailable: {}", e);
    }
    log::info!("verifying {}", cli.path.display());

    // 3. 校验
    let outcome = Driver::new().verify_file(&cli.path);
    let code = match &outcome {
        Ok(()) => EXIT_VALID,
        Err(err) => err.code(),
    };

    // 4. 输出结果
    if cli.json {
        match Report::from_outcome(&cli.path, &outcome).to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: could not encode report: {}", e),
        }
    } else {
        println!("{}", code);
    }
    if let Err(err) = &outcome {
        eprintln!("{}", err.diagnostic());
    }

    std::process::exit(code);
}
