//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;
use opss_common::{ApiError, ApiResult};
use opss_data::DataContext;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::{Config, DashboardConfig};

pub const LAYOUT_TEMPLATE: &str = "layout.html";
pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";

/// Shared state injected into every Axum handler.
pub struct AppState {
    /// Both base tables; handlers only ever read them.
    pub data: Arc<DataContext>,
    pub access_token: Option<SecretString>,
    pub dashboard: DashboardConfig,
    pub static_dir: PathBuf,
    templates: Environment<'static>,
}

impl AppState {
    pub fn new(
        data: DataContext,
        access_token: Option<SecretString>,
        dashboard: DashboardConfig,
        static_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let mut templates = Environment::new();
        templates.add_template(LAYOUT_TEMPLATE, include_str!("../templates/layout.html"))?;
        templates.add_template(DASHBOARD_TEMPLATE, include_str!("../templates/dashboard.html"))?;

        Ok(Self {
            data: Arc::new(data),
            access_token,
            dashboard,
            static_dir,
            templates,
        })
    }

    pub fn from_config(config: Config, data: DataContext) -> anyhow::Result<Self> {
        Self::new(
            data,
            config.security.access_token,
            config.dashboard,
            config.server.static_dir,
        )
    }

    /// Does the presented token match the configured secret? Always false
    /// when no secret is configured.
    pub fn token_matches(&self, presented: Option<&str>) -> bool {
        match (&self.access_token, presented) {
            (Some(expected), Some(given)) => expected.expose_secret() == given,
            _ => false,
        }
    }

    pub fn render<C: Serialize>(&self, template: &str, ctx: C) -> ApiResult<String> {
        self.templates
            .get_template(template)
            .and_then(|t| t.render(ctx))
            .map_err(|e| ApiError::Internal(format!("template {template}: {e}")))
    }
}

pub type SharedState = Arc<AppState>;
