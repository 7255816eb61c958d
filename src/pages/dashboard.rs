use askama::Template;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::instrument;

use crate::auth::{AuthContext, PublicUser};
use crate::pages::dialog::Dialog;
use crate::pages::render_html;

pub const SIGNIN_PATH: &str = "/auth/signin";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    name: &'a str,
    shortcuts_dialog: &'a str,
}

#[derive(Template)]
#[template(path = "loading.html")]
struct LoadingTemplate;

/// What the dashboard route does for a given authentication context.
///
/// Total over the context: an unresolved context only ever produces the
/// waiting page. The sign-in redirect is issued for exactly one state, a
/// context that has resolved to unauthenticated.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardPage {
    Loading,
    RedirectToSignin,
    Content { name: String },
}

pub fn page_for(ctx: &AuthContext) -> DashboardPage {
    match ctx {
        AuthContext::Loading => DashboardPage::Loading,
        AuthContext::Unauthenticated => DashboardPage::RedirectToSignin,
        AuthContext::Authenticated(user) => DashboardPage::Content {
            name: display_name(user),
        },
    }
}

fn display_name(user: &PublicUser) -> String {
    user.name
        .clone()
        .or_else(|| user.username.clone())
        .unwrap_or_else(|| user.email.clone())
}

impl IntoResponse for DashboardPage {
    fn into_response(self) -> Response {
        match self {
            DashboardPage::Loading => render_html(LoadingTemplate),
            DashboardPage::RedirectToSignin => Redirect::to(SIGNIN_PATH).into_response(),
            DashboardPage::Content { name } => {
                let shortcuts = Dialog {
                    open: false,
                    title: "Keyboard shortcuts",
                    body: "Press s to start a focus session, b to take a break.",
                };
                match shortcuts.render() {
                    Ok(dialog_html) => render_html(DashboardTemplate {
                        name: &name,
                        shortcuts_dialog: &dialog_html,
                    }),
                    Err(e) => {
                        tracing::error!(error = %e, "dialog render failed");
                        render_html(DashboardTemplate {
                            name: &name,
                            shortcuts_dialog: "",
                        })
                    }
                }
            }
        }
    }
}

#[instrument(skip(ctx))]
pub async fn dashboard(ctx: AuthContext) -> DashboardPage {
    page_for(&ctx)
}
