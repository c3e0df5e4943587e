//! Route options and the function shapes used to register gated routes.

use crate::kratos::{FrontendApi, IdentityApi, OAuth2Api, PermissionApi};
use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

/// Branding passed to pages that render self-service UI.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family_mono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_muted_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_emphasis_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_muted_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_canvas_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_surface_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_default_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_emphasis_color: Option<String>,
}

impl Theme {
    /// Load a theme from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid theme.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid theme file: {}", path.display()))
    }
}

/// Provider handles and branding available to a gated route.
#[derive(Clone, Debug)]
pub struct RouteOptions {
    pub frontend: Arc<dyn FrontendApi>,
    pub oauth2: OAuth2Api,
    pub permissions: PermissionApi,
    pub identity: IdentityApi,
    pub kratos_browser_url: String,
    pub logo_url: Option<String>,
    pub theme: Option<Theme>,
}

impl RouteOptions {
    #[must_use]
    pub fn new(
        frontend: Arc<dyn FrontendApi>,
        oauth2: OAuth2Api,
        permissions: PermissionApi,
        identity: IdentityApi,
        kratos_browser_url: String,
    ) -> Self {
        Self {
            frontend,
            oauth2,
            permissions,
            identity,
            kratos_browser_url,
            logo_url: None,
            theme: None,
        }
    }

    #[must_use]
    pub fn with_logo_url(mut self, logo_url: Option<String>) -> Self {
        self.logo_url = logo_url;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Option<Theme>) -> Self {
        self.theme = theme;
        self
    }

    /// A creator that hands out these options for every request.
    #[must_use]
    pub fn into_creator(self) -> RouteOptionsCreator {
        Arc::new(move |_: &Request| self.clone())
    }
}

/// Produces the [`RouteOptions`] for the request being served.
pub trait CreateRouteOptions: Send + Sync {
    fn create(&self, request: &Request) -> RouteOptions;
}

impl<F> CreateRouteOptions for F
where
    F: Fn(&Request) -> RouteOptions + Send + Sync,
{
    fn create(&self, request: &Request) -> RouteOptions {
        self(request)
    }
}

pub type RouteOptionsCreator = Arc<dyn CreateRouteOptions>;

/// Wraps every route of a router in a gate built from the creator.
pub type RouteCreator<S = ()> = fn(Router<S>, RouteOptionsCreator) -> Router<S>;

/// Adds a route to a router, optionally at a path other than its default.
pub type RouteRegistrator<S = ()> = fn(Router<S>, RouteOptionsCreator, Option<&str>) -> Router<S>;
