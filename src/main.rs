use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use sitesnap::core::{parse_base_url, run, SnapshotError, SnapshotOptions, DEFAULT_OUTPUT_DIR};
use sitesnap::env::{describe_env_vars, logging, EnvVar};
use sitesnap::whitelist::{EmptyPolicy, MatchMode, Whitelist};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Single-dash spellings accepted on top of clap's one-letter short flags
const SHORT_ALIASES: &[(&str, &str)] = &[("-url", "--base_url"), ("-wf", "--whitelist_file")];

#[derive(Parser, Debug)]
#[command(
    name = "sitesnap",
    version,
    about = "Saves a website and its whitelisted subpages for offline browsing"
)]
struct Cli {
    /// Base URL to snapshot (also -url)
    #[arg(long = "base_url", value_name = "URL")]
    base_url: String,

    /// Whitelist patterns selecting which linked pages are saved
    #[arg(
        short = 'w',
        long = "whitelist",
        value_name = "PATTERN",
        num_args = 1..,
        conflicts_with = "whitelist_file"
    )]
    whitelist: Vec<String>,

    /// File with one whitelist pattern per line (also -wf)
    #[arg(long = "whitelist_file", value_name = "FILE")]
    whitelist_file: Option<PathBuf>,

    /// Directory the snapshot directory is created in
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// How patterns are matched: suffix or substring
    #[arg(short = 'm', long = "match_mode", value_name = "MODE", default_value_t = MatchMode::Suffix)]
    match_mode: MatchMode,

    /// Meaning of an empty whitelist: match-all or match-none
    #[arg(
        short = 'e',
        long = "empty_whitelist",
        value_name = "POLICY",
        default_value_t = EmptyPolicy::MatchNone
    )]
    empty_whitelist: EmptyPolicy,

    /// Per-request timeout in seconds
    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    timeout: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(short = 'u', long = "user_agent", value_name = "AGENT")]
    user_agent: Option<String>,

    /// Also write report.json into the snapshot directory
    #[arg(short = 'r', long = "report")]
    report: bool,
}

fn main() -> ExitCode {
    let matches = Cli::command()
        .after_help(env_help())
        .get_matches_from(expand_short_aliases(std::env::args_os()));
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing();

    match build_options(cli).and_then(|options| run(&options)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Rewrites `-url` and `-wf` into their long forms before clap sees them.
fn expand_short_aliases<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };

            for (alias, long) in SHORT_ALIASES {
                if text == *alias {
                    return OsString::from(*long);
                }
                if let Some(value) = text
                    .strip_prefix(alias)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    return OsString::from(format!("{long}={value}"));
                }
            }

            arg
        })
        .collect()
}

fn env_help() -> String {
    let mut help = String::from("Environment variables:\n");
    for (name, description) in describe_env_vars() {
        help.push_str(&format!("  {name:<22}{description}\n"));
    }
    help
}

fn build_options(cli: Cli) -> Result<SnapshotOptions, SnapshotError> {
    parse_base_url(&cli.base_url)?;

    let mut options = SnapshotOptions::from_env()?;

    options.whitelist = match &cli.whitelist_file {
        Some(path) => Whitelist::load(path, cli.match_mode, cli.empty_whitelist)?,
        None => Whitelist::new(&cli.whitelist, cli.match_mode, cli.empty_whitelist),
    };
    options.base_url = cli.base_url;
    options.output_root = cli.output;
    options.write_report = cli.report;
    if let Some(timeout) = cli.timeout {
        options.timeout = timeout;
    }
    if let Some(user_agent) = cli.user_agent {
        options.user_agent = user_agent;
    }

    Ok(options)
}

fn init_tracing() {
    let level = logging::LogLevel::get();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let fallback = level.clone().ok().flatten();
        EnvFilter::new(fallback.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
    });
    let no_color = logging::NoColor::get().ok().flatten().unwrap_or(false);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = level {
        warn!("{e}, falling back to \"{DEFAULT_LOG_LEVEL}\"");
    }
}
