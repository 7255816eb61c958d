use askama::Template;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::instrument;

use crate::auth::AuthContext;
use crate::pages::render_html;

pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Template)]
#[template(path = "signin.html")]
struct SigninTemplate;

/// Sign-in entry point. Visitors who already hold a live session go straight
/// back to the dashboard.
#[instrument(skip(ctx))]
pub async fn signin_page(ctx: AuthContext) -> Response {
    match ctx.user() {
        Some(_) => Redirect::to(DASHBOARD_PATH).into_response(),
        None => render_html(SigninTemplate),
    }
}
