use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::{debug, warn};

use crate::auth::dto::PublicUser;
use crate::auth::repo_types::User;
use crate::auth::session::SessionKeys;
use crate::state::AppState;

/// Authentication state for a page request.
///
/// `Loading` is the unresolved state: the session cookie has not yet been
/// checked against the credential store. Views render a waiting state for it
/// and must not issue a redirect until the context settles into one of the
/// two resolved variants.
#[derive(Debug, Clone)]
pub enum AuthContext {
    Loading,
    Unauthenticated,
    Authenticated(PublicUser),
}

impl AuthContext {
    pub fn user(&self) -> Option<&PublicUser> {
        match self {
            AuthContext::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthContext::Loading)
    }

    /// Resolves the context from the request's `Cookie` header.
    ///
    /// Anything short of a verified token naming a live user resolves to
    /// `Unauthenticated`: missing cookie, bad signature, expired token,
    /// deleted user. Store failures degrade the same way instead of
    /// surfacing an error page.
    pub async fn resolve(state: &AppState, cookie_header: Option<&str>) -> Self {
        let keys = SessionKeys::from_ref(state);

        let Some(header) = cookie_header else {
            return Self::Unauthenticated;
        };
        let Some(token) = keys.token_from_cookie_header(header) else {
            return Self::Unauthenticated;
        };
        let claims = match keys.verify(&token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("session token rejected");
                return Self::Unauthenticated;
            }
        };

        match User::find_by_id(&state.db, claims.sub).await {
            Ok(Some(user)) => Self::Authenticated(PublicUser::from(user)),
            Ok(None) => {
                debug!(user_id = %claims.sub, "session names a missing user");
                Self::Unauthenticated
            }
            Err(e) => {
                warn!(error = %e, "session user lookup failed");
                Self::Unauthenticated
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_header = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok());
        Ok(Self::resolve(state, cookie_header).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_cookie_resolves_unauthenticated() {
        let state = AppState::fake();
        let ctx = AuthContext::resolve(&state, None).await;
        assert!(matches!(ctx, AuthContext::Unauthenticated));
        assert!(ctx.is_resolved());
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn unrelated_cookies_resolve_unauthenticated() {
        let state = AppState::fake();
        let ctx = AuthContext::resolve(&state, Some("theme=dark; lang=en")).await;
        assert!(matches!(ctx, AuthContext::Unauthenticated));
    }

    #[tokio::test]
    async fn tampered_token_resolves_unauthenticated() {
        let state = AppState::fake();
        let ctx =
            AuthContext::resolve(&state, Some("focustrack_session=eyJhbGciOi.broken.sig")).await;
        assert!(matches!(ctx, AuthContext::Unauthenticated));
    }

    #[test]
    fn loading_is_not_resolved() {
        assert!(!AuthContext::Loading.is_resolved());
        assert!(AuthContext::Loading.user().is_none());
    }
}
