// src/auth.rs

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AdminSession, SignInMethod};
use crate::repository;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::Connection;

const MIN_PASSWORD_CHARS: usize = 8;

/// Checks the configured admin pair first, then stored admin accounts.
pub fn sign_in(
    conn: &Connection,
    config: &Config,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> AppResult<AdminSession> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    if let Some(admin) = &config.admin {
        if admin.username == username && matches_configured_password(&admin.password, password)? {
            info!("Admin '{}' signed in with configured credentials", username);
            return Ok(AdminSession {
                user: username.to_string(),
                method: SignInMethod::Environment,
                signed_in_at: now,
            });
        }
    }

    let email = username.to_lowercase();
    if let Some(hash) = repository::admin_password_hash(conn, &email)? {
        if verify_password(&hash, password)? {
            info!("Admin '{}' signed in", email);
            return Ok(AdminSession {
                user: email,
                method: SignInMethod::Account,
                signed_in_at: now,
            });
        }
    }

    warn!("Failed sign-in attempt for '{}'", username);
    Err(AppError::InvalidCredentials)
}

pub fn create_admin_account(
    conn: &Connection,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation(format!("'{}' is not an email address", email)));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    if repository::admin_password_hash(conn, &email)?.is_some() {
        return Err(AppError::Validation(format!("Account '{}' already exists", email)));
    }

    let hash = hash_password(password)?;
    let id = repository::insert_admin_account(conn, &email, &hash, now)?;
    info!("Created admin account '{}'", email);
    Ok(id)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// The configured password goes through the same Argon2 verification as
/// stored accounts, so the comparison does not short-circuit on content.
fn matches_configured_password(configured: &str, password: &str) -> AppResult<bool> {
    let hash = hash_password(configured)?;
    verify_password(&hash, password)
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
