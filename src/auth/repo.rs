use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Fields for a row insert. The caller hashes the password first.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Which unique constraint a rejected insert tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    Email,
    Username,
}

fn column_for_constraint(name: &str) -> Option<UniqueColumn> {
    match name {
        "users_email_key" => Some(UniqueColumn::Email),
        "users_username_key" => Some(UniqueColumn::Username),
        _ => None,
    }
}

/// Inspects a storage error for a unique-constraint violation. The database
/// constraint is the authoritative uniqueness check; pre-insert lookups only
/// narrow the window.
pub fn unique_violation(err: &sqlx::Error) -> Option<UniqueColumn> {
    let db = match err {
        sqlx::Error::Database(db) => db,
        _ => return None,
    };
    if !db.is_unique_violation() {
        return None;
    }
    db.constraint().and_then(column_for_constraint)
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, name, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. A concurrent duplicate surfaces here as a
    /// unique-constraint violation, see [`unique_violation`].
    pub async fn create(db: &PgPool, new: NewUser<'_>) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(new.email)
        .bind(new.username)
        .bind(new.name)
        .bind(new.password_hash)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_constraints_map_to_columns() {
        assert_eq!(
            column_for_constraint("users_email_key"),
            Some(UniqueColumn::Email)
        );
        assert_eq!(
            column_for_constraint("users_username_key"),
            Some(UniqueColumn::Username)
        );
    }

    #[test]
    fn unknown_constraint_is_not_a_duplicate() {
        assert_eq!(column_for_constraint("users_pkey"), None);
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert_eq!(unique_violation(&sqlx::Error::RowNotFound), None);
    }
}
