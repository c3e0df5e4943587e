//! Command line surface of the `gatekeeper` binary.

pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod telemetry;

use self::actions::Action;
use anyhow::Result;

/// Parse the command line, set up logging and return the action to run.
///
/// # Errors
/// Returns an error if telemetry cannot be initialized or the arguments are invalid.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(commands::logging::level(&matches))?;

    dispatch::handler(&matches)
}
