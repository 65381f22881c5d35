use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UniqueField;
use crate::user::errors::UserError;

const USERNAME_KEY: &str = "users_username_lower_key";
const EMAIL_KEY: &str = "users_email_lower_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_KEY) => return UserError::Conflict(UniqueField::Username),
                Some(EMAIL_KEY) => return UserError::Conflict(UniqueField::Email),
                _ => {}
            }
        }
    }
    store_unavailable(e)
}

fn store_unavailable(e: sqlx::Error) -> UserError {
    tracing::error!(error = %e, "User store query failed");
    UserError::StoreUnavailable(e.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, UserError> {
    let email: Option<String> = row.try_get("email").map_err(store_unavailable)?;

    Ok(User {
        id: UserId(row.try_get("id").map_err(store_unavailable)?),
        username: Username::new(row.try_get("username").map_err(store_unavailable)?)?,
        email: email.map(EmailAddress::new).transpose()?,
        password_hash: row.try_get("password_hash").map_err(store_unavailable)?,
        created_at: row.try_get("created_at").map_err(store_unavailable)?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let user = user.with_id(UserId::new());

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_unavailable)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE lower(username) = $1
            "#,
        )
        .bind(username.key())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_unavailable)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(email.key())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_unavailable)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn replace(&self, user: User) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(())
    }
}
