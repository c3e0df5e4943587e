use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_LOGO_URL: &str = "logo-url";
pub const ARG_THEME: &str = "theme";

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub logo_url: Option<String>,
    pub theme_path: Option<PathBuf>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            logo_url: matches
                .get_one::<String>(ARG_LOGO_URL)
                .cloned()
                .filter(|v| !v.trim().is_empty()),
            theme_path: matches.get_one::<PathBuf>(ARG_THEME).cloned(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGO_URL)
                .long(ARG_LOGO_URL)
                .help("Logo URL shown on login pages")
                .env("GATEKEEPER_LOGO_URL"),
        )
        .arg(
            Arg::new(ARG_THEME)
                .long(ARG_THEME)
                .help("Path to a JSON theme file for login pages")
                .env("GATEKEEPER_THEME")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}
