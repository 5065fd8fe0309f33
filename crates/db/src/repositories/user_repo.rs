//! Repository for the `users` table.

use crowdsense_core::roles::ROLE_ADMIN;
use crowdsense_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{AdminUserRow, CreateUser, RoleChange, User, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, email, username, password_hash, first_name, last_name, role, \
                       is_active, is_email_verified, last_login_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Profile fields for a user.
    pub async fn get_profile(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT first_name, last_name, email FROM users WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Update first/last name. Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "UPDATE users SET first_name = $2, last_name = $3, updated_at = NOW()
             WHERE user_id = $1
             RETURNING first_name, last_name, email",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(pool)
        .await
    }

    /// List all users for the admin console, most recently created first.
    pub async fn list_for_admin(pool: &PgPool) -> Result<Vec<AdminUserRow>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserRow>(
            "SELECT user_id, email, first_name, last_name, role, created_at,
                    last_login_at AS last_login,
                    CASE WHEN is_active THEN 'active' ELSE 'inactive' END AS status
             FROM users
             ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Stamp `last_login_at` with the current time.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Change a user's role without ever leaving the system without an admin.
    ///
    /// Demotions lock every admin row before touching the target, so two
    /// admins demoting each other concurrently are serialized and the second
    /// one sees [`RoleChange::LastAdmin`].
    pub async fn change_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<RoleChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let admins: Vec<DbId> = if role == ROLE_ADMIN {
            Vec::new()
        } else {
            sqlx::query_scalar(
                "SELECT user_id FROM users WHERE role = $1 ORDER BY user_id FOR UPDATE",
            )
            .bind(ROLE_ADMIN)
            .fetch_all(&mut *tx)
            .await?
        };

        let current: Option<String> =
            sqlx::query_scalar("SELECT role FROM users WHERE user_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(RoleChange::NotFound);
        };

        if current == ROLE_ADMIN && role != ROLE_ADMIN && admins.len() <= 1 {
            return Ok(RoleChange::LastAdmin);
        }

        sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(RoleChange::Updated)
    }

    /// Activate or deactivate a user. Returns `true` if the row was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE user_id = $1")
                .bind(id)
                .bind(is_active)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
