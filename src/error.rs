// src/error.rs

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Which banner the front end shows for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    Admin,
    Load,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Seed data is malformed: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Admin session required")]
    Unauthorized,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("{0} is already scheduled for another question")]
    DateOccupied(NaiveDate),

    #[error("A {0} solution already exists for this question")]
    DuplicateLanguage(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("Application state is unavailable")]
    StatePoisoned,

    #[error("Could not open link: {0}")]
    Browser(#[from] std::io::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized | AppError::PasswordHash(_) => {
                ErrorKind::Auth
            }
            AppError::DateOccupied(_)
            | AppError::DuplicateLanguage(_)
            | AppError::NotFound { .. }
            | AppError::Validation(_) => ErrorKind::Admin,
            AppError::Database(_)
            | AppError::Seed(_)
            | AppError::StatePoisoned
            | AppError::Browser(_) => ErrorKind::Load,
        }
    }
}

// Tauri hands command errors to the webview as JSON.
impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("kind", &self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

pub type AppResult<T> = Result<T, AppError>;
