use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use tracing::debug;
use rexbook_core::build_site;
use crate::config::RexbookConfig;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Directory with one subdirectory per topic [default: ./topics]")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory, replaced on every build [default: ./html_output]")
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory with templates/ and assets/ overrides [default: ./theme]")
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./rexbook.toml]")
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Run every example and generate the HTML pages (the default)")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = RexbookConfig::load(args)?;
    debug!(?config, "resolved configuration");
    let build = &config.build;

    let output_dir = Path::new(&build.output);
    let report = build_site(
        &config.site,
        Path::new(&build.source),
        output_dir,
        Path::new(&build.theme),
    )?;

    println!(
        "Generated {} pages for {} topics ({} examples) in {}",
        report.pages,
        report.topics,
        report.examples,
        output_dir.display()
    );
    if !report.skipped.is_empty() {
        println!("  {} example directories skipped", report.skipped.len());
    }
    if !report.failures.is_empty() {
        println!("  {} patterns failed to compile (shown inline)", report.failures.len());
    }
    println!("  Open: {}", output_dir.join("index.html").display());

    Ok(())
}
