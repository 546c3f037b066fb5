use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod render;
mod report;

/// Generate a Maven parent POM from a list of jar files.
///
/// Each line of FILE is a path to a jar. Jars are grouped by short name,
/// the best version of each is kept, and its Maven group is found through
/// prefix rules, the local Maven repository or the Maven Central search
/// service.
///
/// EXAMPLES:
///     jarpom jars.txt                        Print the dependency block
///     jarpom jars.txt -o pom.xml             Write a complete POM
///     jarpom jars.txt --provided -o pom.xml  Mark dependencies as provided
///     jarpom jars.txt --offline --json       Skip remote lookups, JSON report
///
/// ENVIRONMENT VARIABLES:
///     JARPOM_LOG               Log filter (e.g. "info", "jarpom_resolve=debug")
///     JARPOM_OFFLINE           Set to '1' to disable the search service
///     JARPOM_JSON              Set to '1' for JSON output by default
///     JARPOM_SEARCH_URL        Override the search service URL
///     JARPOM_LOCAL_REPOSITORY  Override the local repository (empty disables it)
#[derive(Parser)]
#[command(name = "jarpom")]
#[command(version)]
struct Cli {
    /// Text file with one jar path per line
    #[arg(value_name = "FILE")]
    input_file: PathBuf,

    /// Set every dependency to provided scope
    #[arg(long)]
    provided: bool,

    /// Write a complete POM (header, dependencies, footer) to this file
    #[arg(long, short = 'o', visible_alias = "output_file", value_name = "PATH")]
    output_file: Option<PathBuf>,

    /// Configuration file to use instead of the nearest jarpom.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never query the remote search service
    #[arg(long, env = "JARPOM_OFFLINE", value_parser = BoolishValueParser::new())]
    offline: bool,

    /// Print the manifest and exclusions as JSON
    #[arg(long, env = "JARPOM_JSON", value_parser = BoolishValueParser::new())]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only, no progress spinner
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_env("JARPOM_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    commands::generate::run(commands::generate::GenerateArgs {
        input_file: cli.input_file,
        provided: cli.provided,
        output_file: cli.output_file,
        config: cli.config,
        offline: cli.offline,
        json: cli.json,
        quiet: cli.quiet,
    })
}
