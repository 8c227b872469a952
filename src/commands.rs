// src/commands.rs

use crate::admin;
use crate::auth;
use crate::catalog;
use crate::constants::SUPPORTED_LANGUAGES;
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminSession, AppState, Catalog, Category, Question, QuestionDraft, QuestionFilter,
    SaveOutcome, Solution, SolutionDraft,
};
use crate::repository;
use chrono::{Local, NaiveDate, Utc};
use log::{debug, error};
use tauri::State;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Logs a failed command before it goes back to the webview.
fn logged<T>(command: &str, result: AppResult<T>) -> AppResult<T> {
    if let Err(e) = &result {
        error!("[{}] {}", command, e);
    }
    result
}

// --- Browsing ---

#[tauri::command]
pub fn list_categories(state: State<AppState>) -> AppResult<Vec<Category>> {
    let result = state
        .connection()
        .and_then(|conn| Ok(repository::list_categories(&conn)?));
    logged("list_categories", result)
}

#[tauri::command]
pub fn load_catalog(state: State<AppState>) -> AppResult<Catalog> {
    let result = (|| -> AppResult<_> {
        let session = state.current_session()?;
        let conn = state.connection()?;
        catalog::load_catalog(&conn, session.as_ref(), today())
    })();
    logged("load_catalog", result)
}

#[tauri::command]
pub fn question_of_the_day(state: State<AppState>) -> AppResult<Option<Question>> {
    let result = (|| -> AppResult<_> {
        let session = state.current_session()?;
        let conn = state.connection()?;
        Ok(catalog::browse_catalog(&conn, session.as_ref(), today())?.question_of_the_day)
    })();
    logged("question_of_the_day", result)
}

#[tauri::command]
pub fn search_questions(state: State<AppState>, filter: QuestionFilter) -> AppResult<Vec<Question>> {
    let result = (|| -> AppResult<_> {
        let session = state.current_session()?;
        let conn = state.connection()?;
        catalog::search_questions(&conn, session.as_ref(), today(), &filter)
    })();
    logged("search_questions", result)
}

#[tauri::command]
pub fn supported_languages() -> Vec<String> {
    SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
}

#[tauri::command]
pub fn open_external_url(url: String) -> AppResult<()> {
    let result = if url.starts_with("https://") || url.starts_with("http://") {
        webbrowser::open(&url).map_err(AppError::from)
    } else {
        Err(AppError::Validation(format!("Refusing to open '{}'", url)))
    };
    logged("open_external_url", result)
}

// --- Session ---

#[tauri::command]
pub fn sign_in(state: State<AppState>, username: String, password: String) -> AppResult<AdminSession> {
    let result = (|| -> AppResult<_> {
        let session = {
            let conn = state.connection()?;
            auth::sign_in(&conn, &state.config, &username, &password, Utc::now())?
        };
        state.set_session(Some(session.clone()))?;
        Ok(session)
    })();
    logged("sign_in", result)
}

#[tauri::command]
pub fn sign_out(state: State<AppState>) -> AppResult<()> {
    if let Some(session) = state.current_session()? {
        debug!("Signing out '{}'", session.user);
    }
    logged("sign_out", state.set_session(None))
}

#[tauri::command]
pub fn current_session(state: State<AppState>) -> AppResult<Option<AdminSession>> {
    state.current_session()
}

// --- Admin ---

#[tauri::command]
pub fn occupied_dates(state: State<AppState>) -> AppResult<Vec<NaiveDate>> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::occupied_dates(&conn)
    })();
    logged("occupied_dates", result)
}

#[tauri::command]
pub fn next_available_date(state: State<AppState>) -> AppResult<NaiveDate> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::next_available_date(&conn, today())
    })();
    logged("next_available_date", result)
}

#[tauri::command]
pub fn save_question(
    state: State<AppState>,
    editing_id: Option<i64>,
    question: QuestionDraft,
    solution: Option<SolutionDraft>,
) -> AppResult<SaveOutcome> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::save_question(&conn, editing_id, question, solution, Utc::now())
    })();
    logged("save_question", result)
}

#[tauri::command]
pub fn delete_question(state: State<AppState>, id: i64) -> AppResult<usize> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::delete_question(&conn, id)
    })();
    logged("delete_question", result)
}

#[tauri::command]
pub fn add_solution(
    state: State<AppState>,
    question_id: i64,
    solution: SolutionDraft,
) -> AppResult<Solution> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::add_solution(&conn, question_id, solution)
    })();
    logged("add_solution", result)
}

#[tauri::command]
pub fn delete_solution(state: State<AppState>, id: i64) -> AppResult<()> {
    let result = (|| -> AppResult<_> {
        state.require_admin()?;
        let conn = state.connection()?;
        admin::delete_solution(&conn, id)
    })();
    logged("delete_solution", result)
}
