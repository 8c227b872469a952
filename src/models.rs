// src/models.rs

use crate::config::Config;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

// --- App State ---

pub struct AppState {
    pub db: Mutex<Connection>,
    pub session: Mutex<Option<AdminSession>>,
    pub config: Config,
}

impl AppState {
    pub fn new(conn: Connection, config: Config) -> Self {
        AppState {
            db: Mutex::new(conn),
            session: Mutex::new(None),
            config,
        }
    }

    pub fn connection(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| AppError::StatePoisoned)
    }

    pub fn current_session(&self) -> AppResult<Option<AdminSession>> {
        let session = self.session.lock().map_err(|_| AppError::StatePoisoned)?;
        Ok(session.clone())
    }

    pub fn set_session(&self, value: Option<AdminSession>) -> AppResult<()> {
        let mut session = self.session.lock().map_err(|_| AppError::StatePoisoned)?;
        *session = value;
        Ok(())
    }

    /// Gate for write operations.
    pub fn require_admin(&self) -> AppResult<AdminSession> {
        self.current_session()?.ok_or(AppError::Unauthorized)
    }
}

// --- Data Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub reference_link: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub id: i64,
    pub question_id: i64,
    pub language: String,
    pub code: String,
}

// --- Admin Form Input ---

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuestionDraft {
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub reference_link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SolutionDraft {
    pub language: String,
    pub code: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct SaveOutcome {
    pub question: Question,
    pub solution: Option<Solution>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuestionFilter {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub search: String,
    /// Also match description and tags, not only the title.
    #[serde(default)]
    pub include_details: bool,
}

// --- Session ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignInMethod {
    Environment,
    Account,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AdminSession {
    pub user: String,
    pub method: SignInMethod,
    pub signed_in_at: DateTime<Utc>,
}

// --- Loader Output ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    pub question_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Serialize, Debug, Clone)]
pub struct Catalog {
    pub today: NaiveDate,
    pub categories: Vec<Category>,
    /// Everything for an admin, only the question of the day otherwise.
    pub questions: Vec<Question>,
    pub solutions: HashMap<i64, Vec<Solution>>,
    pub question_of_the_day: Option<Question>,
    pub rescheduled: Vec<Reassignment>,
}

// Used for seeding
#[derive(Deserialize)]
pub struct JsonSeed {
    pub categories: Vec<String>,
    pub questions: Vec<JsonQuestion>,
}

#[derive(Deserialize)]
pub struct JsonQuestion {
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub description: String,
    #[serde(default)]
    pub reference_link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<JsonSolution>,
}

#[derive(Deserialize)]
pub struct JsonSolution {
    pub language: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Connection::open_in_memory().unwrap(),
            Config::from_lookup(|_| None),
        )
    }

    fn session() -> AdminSession {
        AdminSession {
            user: "admin".into(),
            method: SignInMethod::Environment,
            signed_in_at: Utc::now(),
        }
    }

    #[test]
    fn admin_gate_follows_the_session() {
        let state = state();
        assert!(matches!(state.require_admin(), Err(AppError::Unauthorized)));
        assert_eq!(state.current_session().unwrap(), None);

        state.set_session(Some(session())).unwrap();
        assert_eq!(state.require_admin().unwrap().user, "admin");

        state.set_session(None).unwrap();
        assert!(matches!(state.require_admin(), Err(AppError::Unauthorized)));
    }

    #[test]
    fn poisoned_session_lock_is_reported() {
        let state = state();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = state.session.lock().unwrap();
            panic!("poison the lock");
        }));
        assert!(matches!(state.require_admin(), Err(AppError::StatePoisoned)));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("Brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn draft_defaults_apply_when_fields_are_missing() {
        let draft: QuestionDraft =
            serde_json::from_str(r#"{"category_id": 3, "title": "Two Sum"}"#).unwrap();
        assert_eq!(draft.difficulty, Difficulty::Medium);
        assert!(draft.is_active);
        assert!(draft.scheduled_date.is_none());
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn draft_reads_iso_dates() {
        let draft: QuestionDraft = serde_json::from_str(
            r#"{"category_id": 1, "title": "x", "scheduled_date": "2024-01-06", "difficulty": "Hard"}"#,
        )
        .unwrap();
        assert_eq!(draft.scheduled_date, NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(draft.difficulty, Difficulty::Hard);
    }
}
