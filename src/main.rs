use aura::{bench, demo, repl, runner};
use clap::{value_parser, Arg, ArgAction, Command};
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let matches = Command::new("aura")
        .about("Scanner and value playground for the Aura language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to scan")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("values")
                .long("values")
                .help("Print one sample of every value type")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["file", "interactive"]),
        )
        .arg(
            Arg::new("bench")
                .long("bench")
                .help("Measure scanner throughput over a synthetic source")
                .value_name("ITERATIONS")
                .num_args(0..=1)
                .default_missing_value("100000")
                .value_parser(value_parser!(usize))
                .conflicts_with_all(["file", "interactive", "values"]),
        )
        .get_matches();

    if let Some(&iterations) = matches.get_one::<usize>("bench") {
        return match bench::run(iterations) {
            Ok(report) => {
                println!("{}", report);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Fatal: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if matches.get_flag("values") {
        let stdout = io::stdout();
        if let Err(e) = demo::print_values(&mut stdout.lock()) {
            eprintln!("Error writing values: {}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path),
        _ => {
            repl::start();
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_file(path: &str) -> ExitCode {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let filename = path.to_string_lossy();
    match runner::run(&source, Some(&*filename)) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(errors) => {
            tracing::info!(errors, "scan finished with lexical errors");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error writing tokens: {}", e);
            ExitCode::FAILURE
        }
    }
}
