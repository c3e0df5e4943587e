use crate::{
    app,
    kratos::{
        parse_http_url, ApiConfiguration, IdentityApi, KratosFrontend, OAuth2Api, PermissionApi,
    },
    route::{RouteOptions, Theme},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub kratos_public_url: String,
    pub kratos_browser_url: String,
    pub kratos_admin_url: String,
    pub hydra_admin_url: String,
    pub keto_read_url: String,
    pub logo_url: Option<String>,
    pub theme_path: Option<PathBuf>,
}

/// Build the route options the gates share.
///
/// # Errors
/// Returns an error if a provider URL is invalid or the theme file cannot be loaded.
pub fn route_options(args: &Args) -> Result<RouteOptions> {
    let frontend = KratosFrontend::new(
        ApiConfiguration::new(&args.kratos_public_url).context("Invalid Kratos public URL")?,
    );
    let identity = IdentityApi::new(
        ApiConfiguration::new(&args.kratos_admin_url).context("Invalid Kratos admin URL")?,
    );
    let oauth2 = OAuth2Api::new(
        ApiConfiguration::new(&args.hydra_admin_url).context("Invalid Hydra admin URL")?,
    );
    let permissions = PermissionApi::new(
        ApiConfiguration::new(&args.keto_read_url).context("Invalid Keto read URL")?,
    );

    let kratos_browser_url = parse_http_url(&args.kratos_browser_url)
        .context("Invalid Kratos browser URL")?
        .as_str()
        .trim_end_matches('/')
        .to_string();

    let theme = args
        .theme_path
        .as_deref()
        .map(Theme::from_file)
        .transpose()?;

    Ok(RouteOptions::new(
        Arc::new(frontend),
        oauth2,
        permissions,
        identity,
        kratos_browser_url,
    )
    .with_logo_url(args.logo_url.clone())
    .with_theme(theme))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let options = route_options(&args)?;

    info!(
        "Checking sessions against {}, redirecting browsers to {}",
        args.kratos_public_url, options.kratos_browser_url
    );

    app::serve(args.port, options.into_creator()).await
}
