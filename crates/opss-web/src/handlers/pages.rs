//! Site pages. Each one wraps the dashboard in the shared layout.

use axum::{extract::State, response::Html};
use minijinja::context;
use opss_common::ApiResult;

use crate::state::{SharedState, LAYOUT_TEMPLATE};

pub const DASH_URL: &str = "/dash/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePage {
    Home,
    Standards,
    Services,
    Sectors,
    Topics,
    About,
}

impl SitePage {
    pub fn slug(&self) -> &'static str {
        match self {
            SitePage::Home      => "home",
            SitePage::Standards => "standards",
            SitePage::Services  => "services",
            SitePage::Sectors   => "sectors",
            SitePage::Topics    => "topics",
            SitePage::About     => "about",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SitePage::Home      => "Home",
            SitePage::Standards => "Standards",
            SitePage::Services  => "Services",
            SitePage::Sectors   => "Sectors",
            SitePage::Topics    => "Topics",
            SitePage::About     => "About",
        }
    }
}

fn render(state: &SharedState, page: SitePage) -> ApiResult<Html<String>> {
    let html = state.render(
        LAYOUT_TEMPLATE,
        context! {
            title => page.title(),
            active => page.slug(),
            dash_url => DASH_URL,
        },
    )?;
    Ok(Html(html))
}

pub async fn home(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::Home)
}

pub async fn standards(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::Standards)
}

pub async fn services(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::Services)
}

pub async fn sectors(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::Sectors)
}

pub async fn topics(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::Topics)
}

pub async fn about(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    render(&state, SitePage::About)
}
