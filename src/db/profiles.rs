use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Profile, UserRole};

pub struct NewProfile<'a> {
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: UserRole,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    profile: &NewProfile<'_>,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (full_name, phone, role, email, password_hash)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(profile.full_name)
    .bind(profile.phone)
    .bind(profile.role)
    .bind(profile.email)
    .bind(profile.password_hash)
    .fetch_one(executor)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Profiles that can sign in, i.e. carry both an email and a password hash.
pub async fn count_with_login<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM profiles WHERE email IS NOT NULL AND password_hash IS NOT NULL",
    )
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}

pub async fn list(pool: &PgPool, role: Option<UserRole>) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT * FROM profiles WHERE ($1::user_role IS NULL OR role = $1) ORDER BY full_name",
    )
    .bind(role)
    .fetch_all(pool)
    .await
}
