use clap::{Arg, ArgAction, Command};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;

fn cli() -> Command {
    cmd::build::add_build_args(
        Command::new("rexbook")
            .version(env!("CARGO_PKG_VERSION"))
            .about(env!("CARGO_PKG_DESCRIPTION")),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true)
            .help("More log output (-v debug, -vv trace)"),
    )
    .subcommand(cmd::build::make_subcommand())
    .subcommand(cmd::check::make_subcommand())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,rexbook={level},rexbook_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    setup_logging(matches.get_count("verbose"));

    // No subcommand means build
    let result = match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("check", args)) => cmd::check::execute(args),
        _ => cmd::build::execute(&matches),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
