// main.rs - CLI entry point

use argh::FromArgs;
use pani::cli::{init_logging, log_settings, validate_args, Args, Config, Invocation};
use pani::core::{run, DnadiffComparator};
use pani::error::Result;

fn main() {
    let args = match parse_args() {
        Some(args) => args,
        None => std::process::exit(0),
    };

    if let Err(e) = run_main(args) {
        log::error!("{}", e);
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

/// Parse the command line. Help and usage errors print and yield `None`;
/// a bad command line is not a failure exit.
fn parse_args() -> Option<Args> {
    let strings: Vec<String> = std::env::args().collect();
    let program = strings.first().map(String::as_str).unwrap_or("pani");
    let rest: Vec<&str> = strings.iter().skip(1).map(String::as_str).collect();

    match Args::from_args(&[program], &rest) {
        Ok(args) => Some(args),
        Err(early_exit) => {
            match early_exit.status {
                Ok(()) => println!("{}", early_exit.output),
                Err(()) => {
                    eprintln!("{}", early_exit.output);
                    print_usage(program);
                }
            }
            None
        }
    }
}

fn print_usage(program: &str) {
    if let Err(help) = Args::from_args(&[program], &["--help"]) {
        eprintln!("{}", help.output);
    }
}

fn run_main(args: Args) -> Result<()> {
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    let command = match args.command {
        Some(command) => command,
        None => {
            print_usage("pani");
            return Ok(());
        }
    };

    let mut invocation: Invocation = command.into();
    if let Some(config_path) = &args.config {
        invocation = invocation.with_config_file(config_path)?;
    }

    let validation = validate_args(&invocation)?;
    init_logging(&validation.logfile)?;

    log::info!("pani v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Command line: {}", command_line);
    if let Some(config_path) = &args.config {
        log::info!("Configuration file: {}", config_path);
    }
    log_settings(&validation.run, &validation.logfile);

    let comparator = DnadiffComparator::new(validation.run.tool.clone());
    let summary = run(&validation.run, &comparator)?;

    if !summary.written {
        println!("✅ Dry run completed: {} comparisons planned", summary.comparisons);
    } else if summary.failed > 0 {
        log::warn!(
            "{} of {} comparisons failed, written as NA",
            summary.failed,
            summary.comparisons
        );
        println!(
            "⚠️  Partial {} written to {} ({} comparisons failed)",
            summary.matrix,
            validation.run.output.display(),
            summary.failed
        );
    } else {
        println!(
            "✅ {} written to {}",
            summary.matrix,
            validation.run.output.display()
        );
    }
    log::info!("Done.");
    Ok(())
}
