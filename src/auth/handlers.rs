use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest, RegisterResponse, SessionResponse, SigninRequest},
        password::{hash_password, verify_password},
        repo::{unique_violation, NewUser, UniqueColumn},
        repo_types::User,
        session::{CurrentUser, SessionKeys},
        validate,
    },
    error::{ApiError, FieldViolation},
    state::AppState,
};

pub const DUPLICATE_EMAIL: &str = "User with this email already exists";
pub const DUPLICATE_USERNAME: &str = "Username is already taken";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(mut payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.email = payload.email.trim().to_lowercase();

    let violations = validate::validate_registration(&payload);
    if !violations.is_empty() {
        warn!(violations = violations.len(), "registration payload rejected");
        return Err(ApiError::Validation(violations));
    }

    // Advisory pre-checks; the unique constraints remain the authority.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict(DUPLICATE_EMAIL.into()));
    }
    if let Some(username) = payload.username.as_deref() {
        if User::find_by_username(&state.db, username).await?.is_some() {
            warn!(username = %username, "username already taken");
            return Err(ApiError::Conflict(DUPLICATE_USERNAME.into()));
        }
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    let user = User::create(
        &state.db,
        NewUser {
            email: &payload.email,
            username: payload.username.as_deref(),
            name: payload.name.as_deref(),
            password_hash: &hash,
        },
    )
    .await
    .map_err(conflict_from_insert)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".into(),
            user: PublicUser::from(user),
        }),
    ))
}

/// An insert rejected by a unique constraint lost the race between the
/// pre-check and the write; it gets the same conflict answer the pre-check
/// would have given.
fn conflict_from_insert(err: sqlx::Error) -> ApiError {
    match unique_violation(&err) {
        Some(UniqueColumn::Email) => ApiError::Conflict(DUPLICATE_EMAIL.into()),
        Some(UniqueColumn::Username) => ApiError::Conflict(DUPLICATE_USERNAME.into()),
        None => ApiError::from(err),
    }
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<SessionResponse>), ApiError> {
    let Json(mut payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.email = payload.email.trim().to_lowercase();

    if !validate::is_valid_email(&payload.email) {
        return Err(ApiError::Validation(vec![FieldViolation::new(
            "email",
            "Invalid email address",
        )]));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "sign-in for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "sign-in with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        keys.issue_cookie(&token)
            .parse()
            .map_err(|e| ApiError::internal(anyhow::Error::from(e)))?,
    );

    info!(user_id = %user.id, "user signed in");
    Ok((
        headers,
        Json(SessionResponse {
            message: "Signed in".into(),
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn signout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError> {
    let keys = SessionKeys::from_ref(&state);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        keys.clear_cookie()
            .parse()
            .map_err(|e| ApiError::internal(anyhow::Error::from(e)))?,
    );
    Ok((headers, Json(serde_json::json!({ "message": "Signed out" }))))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn register_response_shape() {
        let response = RegisterResponse {
            message: "User created successfully".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "a@b.com".into(),
                name: None,
                username: None,
                created_at: datetime!(2025-06-01 12:00 UTC),
            },
        };

        let value: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user"]["email"], "a@b.com");
        assert!(value["user"].get("password").is_none());
        assert!(value["user"].get("passwordHash").is_none());
        assert!(value["message"].is_string());
    }

    #[test]
    fn insert_failure_without_constraint_stays_internal() {
        let err = conflict_from_insert(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
