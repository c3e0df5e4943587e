use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSE: &str = "verbose";
pub const ARG_LOG_LEVEL: &str = "log-level";

fn parse_level(level: &str) -> Result<Level, String> {
    level.parse::<Level>().map_err(|_| {
        format!("invalid log level '{level}', expected error, warn, info, debug or trace")
    })
}

/// Level selected by repeating `-v`; no flag keeps the default.
const fn level_from_count(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Resolve the log level: `-v` flags win over `--log-level` and its env var.
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    level_from_count(matches.get_count(ARG_VERBOSE))
        .or_else(|| matches.get_one::<Level>(ARG_LOG_LEVEL).copied())
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSE)
                .short('v')
                .long(ARG_VERBOSE)
                .help("Increase verbosity: -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long(ARG_LOG_LEVEL)
                .help("Log level: error, warn, info, debug, trace (default: error)")
                .env("GATEKEEPER_LOG_LEVEL")
                .value_parser(parse_level),
        )
}
