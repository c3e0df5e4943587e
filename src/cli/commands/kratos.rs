use clap::{Arg, ArgMatches, Command};

pub const ARG_KRATOS_PUBLIC_URL: &str = "kratos-public-url";
pub const ARG_KRATOS_BROWSER_URL: &str = "kratos-browser-url";
pub const ARG_KRATOS_ADMIN_URL: &str = "kratos-admin-url";
pub const ARG_HYDRA_ADMIN_URL: &str = "hydra-admin-url";
pub const ARG_KETO_READ_URL: &str = "keto-read-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub public_url: String,
    pub browser_url: String,
    pub admin_url: String,
    pub hydra_admin_url: String,
    pub keto_read_url: String,
}

impl Options {
    /// Parse identity provider arguments from matches.
    ///
    /// The browser and admin URLs fall back to the public URL.
    ///
    /// # Errors
    /// Returns an error if the public URL is missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // Helper to filter empty strings which clap might pass through if env vars are set to ""
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let Some(public_url) = get_non_empty(ARG_KRATOS_PUBLIC_URL) else {
            anyhow::bail!("missing required argument: --{ARG_KRATOS_PUBLIC_URL}");
        };

        let browser_url =
            get_non_empty(ARG_KRATOS_BROWSER_URL).unwrap_or_else(|| public_url.clone());
        let admin_url = get_non_empty(ARG_KRATOS_ADMIN_URL).unwrap_or_else(|| public_url.clone());

        let hydra_admin_url = get_non_empty(ARG_HYDRA_ADMIN_URL)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_HYDRA_ADMIN_URL}"))?;
        let keto_read_url = get_non_empty(ARG_KETO_READ_URL)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_KETO_READ_URL}"))?;

        Ok(Self {
            public_url,
            browser_url,
            admin_url,
            hydra_admin_url,
            keto_read_url,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_KRATOS_PUBLIC_URL)
                .long(ARG_KRATOS_PUBLIC_URL)
                .help("Kratos public API URL used for whoami calls")
                .env("KRATOS_PUBLIC_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_KRATOS_BROWSER_URL)
                .long(ARG_KRATOS_BROWSER_URL)
                .help("Kratos URL as seen by browsers, used for login flow redirects")
                .long_help(
                    "Kratos URL as seen by browsers, used for login flow redirects.\n\nDefaults to --kratos-public-url when the browser reaches Kratos at the same address.",
                )
                .env("KRATOS_BROWSER_URL"),
        )
        .arg(
            Arg::new(ARG_KRATOS_ADMIN_URL)
                .long(ARG_KRATOS_ADMIN_URL)
                .help("Kratos admin API URL (defaults to --kratos-public-url)")
                .env("KRATOS_ADMIN_URL"),
        )
        .arg(
            Arg::new(ARG_HYDRA_ADMIN_URL)
                .long(ARG_HYDRA_ADMIN_URL)
                .help("Hydra admin API URL")
                .env("HYDRA_ADMIN_URL")
                .default_value("http://127.0.0.1:4445"),
        )
        .arg(
            Arg::new(ARG_KETO_READ_URL)
                .long(ARG_KETO_READ_URL)
                .help("Keto read API URL")
                .env("KETO_READ_URL")
                .default_value("http://127.0.0.1:4466"),
        )
}
