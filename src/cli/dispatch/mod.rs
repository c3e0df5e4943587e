//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{branding, kratos, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or empty.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);

    let kratos_opts = kratos::Options::parse(matches)?;
    let branding_opts = branding::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        kratos_public_url: kratos_opts.public_url,
        kratos_browser_url: kratos_opts.browser_url,
        kratos_admin_url: kratos_opts.admin_url,
        hydra_admin_url: kratos_opts.hydra_admin_url,
        keto_read_url: kratos_opts.keto_read_url,
        logo_url: branding_opts.logo_url,
        theme_path: branding_opts.theme_path,
    }))
}
