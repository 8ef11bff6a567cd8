//! Postgres Repository Implementation

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::entity::{ResetToken, User};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{Email, ResetOtp, TotpSecret, UserName};
use crate::error::{AuthError, AuthResult};

/// Auth storage backed by Postgres
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, user_name, password_hash, mfa_secret, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.user_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.mfa_secret.as_ref().map(|s| s.as_base32()))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify_unique_violation)?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE user_name = $1")
            .bind(user_name.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT email, user_name, password_hash, mfa_secret, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user_row).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT email, user_name, password_hash, mfa_secret, created_at, updated_at
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user_row).transpose()
    }

    async fn update_password(&self, email: &Email, hash: &HashedPassword) -> AuthResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = $3 WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(hash.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl ResetTokenRepository for PgAuthRepository {
    async fn upsert(&self, token: &ResetToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reset_tokens (email, otp, expires_at, verified, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                otp = EXCLUDED.otp,
                expires_at = EXCLUDED.expires_at,
                verified = EXCLUDED.verified,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(token.email.as_str())
        .bind(token.otp.as_str())
        .bind(token.expires_at)
        .bind(token.verified)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<ResetToken>> {
        let row = sqlx::query(
            r#"
            SELECT email, otp, expires_at, verified, created_at
            FROM reset_tokens
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_reset_token_row).transpose()
    }

    async fn mark_verified(&self, email: &Email, now: DateTime<Utc>) -> AuthResult<bool> {
        // Conditional update: concurrent verifications race to this row
        // and exactly one wins.
        let result = sqlx::query(
            r#"
            UPDATE reset_tokens
            SET verified = TRUE
            WHERE email = $1 AND NOT verified AND expires_at >= $2
            "#,
        )
        .bind(email.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume_verified(&self, email: &Email) -> AuthResult<bool> {
        let result = sqlx::query("DELETE FROM reset_tokens WHERE email = $1 AND verified")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Concurrent registrations can still trip the username unique index
/// even after the early existence check.
fn classify_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AuthError::DuplicateUsername;
        }
    }
    AuthError::Database(err)
}

fn map_user_row(row: PgRow) -> AuthResult<User> {
    let email: String = row.try_get("email")?;
    let user_name: String = row.try_get("user_name")?;
    let password_hash: String = row.try_get("password_hash")?;
    let mfa_secret: Option<String> = row.try_get("mfa_secret")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        email: Email::new(email).map_err(corrupt_row)?,
        user_name: UserName::new(user_name).map_err(corrupt_row)?,
        password_hash: HashedPassword::from_phc_string(password_hash).map_err(corrupt_row)?,
        mfa_secret: mfa_secret
            .map(TotpSecret::from_base32)
            .transpose()
            .map_err(corrupt_row)?,
        created_at,
        updated_at,
    })
}

fn map_reset_token_row(row: PgRow) -> AuthResult<ResetToken> {
    let email: String = row.try_get("email")?;
    let otp: String = row.try_get("otp")?;
    let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
    let verified: bool = row.try_get("verified")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(ResetToken {
        email: Email::new(email).map_err(corrupt_row)?,
        otp: ResetOtp::parse(otp).map_err(corrupt_row)?,
        expires_at,
        verified,
        created_at,
    })
}

fn corrupt_row(err: impl std::fmt::Display) -> AuthError {
    AuthError::Internal(format!("Corrupt row: {err}"))
}
