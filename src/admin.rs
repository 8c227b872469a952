// src/admin.rs

use crate::constants::SUPPORTED_LANGUAGES;
use crate::error::{AppError, AppResult};
use crate::models::{QuestionDraft, SaveOutcome, Solution, SolutionDraft};
use crate::repository;
use crate::schedule;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use rusqlite::Connection;

// --- Questions ---

/// Inserts (`editing_id == None`) or updates a question. A solution draft
/// is only attached to new questions, in the same transaction.
pub fn save_question(
    conn: &Connection,
    editing_id: Option<i64>,
    draft: QuestionDraft,
    solution: Option<SolutionDraft>,
    now: DateTime<Utc>,
) -> AppResult<SaveOutcome> {
    let draft = normalize_question(draft)?;

    if !repository::category_exists(conn, draft.category_id)? {
        return Err(AppError::Validation("Select a valid category".into()));
    }
    if let Some(id) = editing_id {
        if repository::get_question(conn, id)?.is_none() {
            return Err(AppError::NotFound { entity: "Question", id });
        }
    }
    if let Some(date) = draft.scheduled_date {
        let taken = repository::question_ids_on_date(conn, date)?;
        if taken.iter().any(|&id| Some(id) != editing_id) {
            warn!("Rejecting save: {} already taken by {:?}", date, taken);
            return Err(AppError::DateOccupied(date));
        }
    }

    // Blank code means the form's solution section was left empty.
    let solution = match (editing_id, solution) {
        (None, Some(s)) if !s.code.trim().is_empty() => Some(normalize_solution(s)?),
        _ => None,
    };

    let tx = conn.unchecked_transaction()?;
    let question_id = match editing_id {
        Some(id) => {
            repository::update_question(&tx, id, &draft, now)?;
            id
        }
        None => repository::insert_question(&tx, &draft, now)?,
    };
    let solution = match solution {
        Some(s) => Some(insert_solution(&tx, question_id, s)?),
        None => None,
    };
    tx.commit()?;

    let question = repository::get_question(conn, question_id)?.ok_or(AppError::NotFound {
        entity: "Question",
        id: question_id,
    })?;
    info!(
        "{} question '{}' (ID: {})",
        if editing_id.is_some() { "Updated" } else { "Added" },
        question.title,
        question.id
    );
    Ok(SaveOutcome { question, solution })
}

/// Removes the solutions first, then the question row. Returns how many
/// solutions went with it.
pub fn delete_question(conn: &Connection, question_id: i64) -> AppResult<usize> {
    let tx = conn.unchecked_transaction()?;
    let removed_solutions = repository::delete_solutions_for_question(&tx, question_id)?;
    if repository::delete_question(&tx, question_id)? == 0 {
        return Err(AppError::NotFound {
            entity: "Question",
            id: question_id,
        });
    }
    tx.commit()?;

    info!(
        "Deleted question {} and {} solution(s)",
        question_id, removed_solutions
    );
    Ok(removed_solutions)
}

pub fn occupied_dates(conn: &Connection) -> AppResult<Vec<NaiveDate>> {
    Ok(repository::occupied_dates(conn)?)
}

/// Default date offered by the question form.
pub fn next_available_date(conn: &Connection, today: NaiveDate) -> AppResult<NaiveDate> {
    let occupied = repository::occupied_dates(conn)?;
    Ok(schedule::next_available_date(occupied, today))
}

// --- Solutions ---

pub fn add_solution(conn: &Connection, question_id: i64, draft: SolutionDraft) -> AppResult<Solution> {
    if repository::get_question(conn, question_id)?.is_none() {
        return Err(AppError::NotFound {
            entity: "Question",
            id: question_id,
        });
    }
    let draft = normalize_solution(draft)?;
    let solution = insert_solution(conn, question_id, draft)?;
    info!(
        "Added {} solution to question {}",
        solution.language, question_id
    );
    Ok(solution)
}

pub fn delete_solution(conn: &Connection, solution_id: i64) -> AppResult<()> {
    if repository::delete_solution(conn, solution_id)? == 0 {
        return Err(AppError::NotFound {
            entity: "Solution",
            id: solution_id,
        });
    }
    info!("Deleted solution {}", solution_id);
    Ok(())
}

fn insert_solution(conn: &Connection, question_id: i64, draft: SolutionDraft) -> AppResult<Solution> {
    let id = repository::insert_solution(conn, question_id, &draft.language, &draft.code)
        .map_err(|e| map_solution_error(e, &draft.language))?;
    Ok(Solution {
        id,
        question_id,
        language: draft.language,
        code: draft.code,
    })
}

fn map_solution_error(err: rusqlite::Error, language: &str) -> AppError {
    let duplicate = matches!(
        &err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    );
    if duplicate {
        warn!("Duplicate {} solution rejected", language);
        AppError::DuplicateLanguage(language.to_string())
    } else {
        AppError::Database(err)
    }
}

// --- Input Normalisation ---

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_question(mut draft: QuestionDraft) -> AppResult<QuestionDraft> {
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    draft.description = draft.description.trim_end().to_string();
    draft.image_url = blank_to_none(draft.image_url);
    draft.reference_link = blank_to_none(draft.reference_link);
    draft.tags = draft
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    Ok(draft)
}

/// Known languages are stored with their canonical label; anything else
/// non-empty is kept as typed.
fn normalize_solution(mut draft: SolutionDraft) -> AppResult<SolutionDraft> {
    let language = draft.language.trim();
    if language.is_empty() {
        return Err(AppError::Validation("Language is required".into()));
    }
    draft.language = SUPPORTED_LANGUAGES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(language))
        .map(|known| known.to_string())
        .unwrap_or_else(|| language.to_string());
    if draft.code.trim().is_empty() {
        return Err(AppError::Validation("Code is required".into()));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;
    use crate::models::Difficulty;
    use crate::schedule::tests::date;
    use rusqlite::params;

    fn category(conn: &Connection) -> i64 {
        conn.execute(
            "INSERT INTO categories (category_name, created_at) VALUES (?, ?)",
            params!["Trees", Utc::now()],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn draft(category_id: i64, title: &str, scheduled: Option<NaiveDate>) -> QuestionDraft {
        QuestionDraft {
            category_id,
            title: title.into(),
            description: "desc".into(),
            difficulty: Difficulty::Medium,
            scheduled_date: scheduled,
            is_active: true,
            ..Default::default()
        }
    }

    fn java(code: &str) -> SolutionDraft {
        SolutionDraft {
            language: "java".into(),
            code: code.into(),
        }
    }

    fn question_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT count(*) FROM questions", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn new_question_is_saved_with_its_solution() {
        let conn = test_connection();
        let c = category(&conn);
        let outcome = save_question(
            &conn,
            None,
            draft(c, "  Invert Tree ", Some(date(2024, 2, 1))),
            Some(java("class S {}")),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.question.title, "Invert Tree");
        let solution = outcome.solution.unwrap();
        assert_eq!(solution.language, "Java");
        assert_eq!(
            repository::solutions_for_question(&conn, outcome.question.id).unwrap(),
            vec![solution]
        );
    }

    #[test]
    fn blank_solution_is_skipped() {
        let conn = test_connection();
        let c = category(&conn);
        let outcome = save_question(&conn, None, draft(c, "a", None), Some(java("   ")), Utc::now())
            .unwrap();
        assert!(outcome.solution.is_none());
    }

    #[test]
    fn occupied_date_is_rejected_and_storage_unchanged() {
        let conn = test_connection();
        let c = category(&conn);
        let day = date(2024, 2, 1);
        save_question(&conn, None, draft(c, "first", Some(day)), None, Utc::now()).unwrap();
        let before = question_count(&conn);

        let err = save_question(&conn, None, draft(c, "second", Some(day)), Some(java("x")), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::DateOccupied(d) if d == day));
        assert_eq!(question_count(&conn), before);
        assert!(repository::solutions_for_questions(&conn, &[1, 2]).unwrap().is_empty());
    }

    #[test]
    fn editing_may_keep_its_own_date() {
        let conn = test_connection();
        let c = category(&conn);
        let day = date(2024, 2, 1);
        let saved = save_question(&conn, None, draft(c, "first", Some(day)), None, Utc::now())
            .unwrap()
            .question;

        let mut changed = draft(c, "renamed", Some(day));
        changed.image_url = Some("  ".into());
        let outcome = save_question(&conn, Some(saved.id), changed, Some(java("ignored")), Utc::now())
            .unwrap();

        assert_eq!(outcome.question.title, "renamed");
        assert_eq!(outcome.question.image_url, None);
        assert!(outcome.solution.is_none());
        assert_eq!(question_count(&conn), 1);
    }

    #[test]
    fn editing_onto_another_questions_date_is_rejected() {
        let conn = test_connection();
        let c = category(&conn);
        save_question(&conn, None, draft(c, "a", Some(date(2024, 2, 1))), None, Utc::now()).unwrap();
        let b = save_question(&conn, None, draft(c, "b", Some(date(2024, 2, 2))), None, Utc::now())
            .unwrap()
            .question;

        let err = save_question(&conn, Some(b.id), draft(c, "b", Some(date(2024, 2, 1))), None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::DateOccupied(_)));
        let stored = repository::get_question(&conn, b.id).unwrap().unwrap();
        assert_eq!(stored.scheduled_date, Some(date(2024, 2, 2)));
    }

    #[test]
    fn invalid_drafts_are_rejected() {
        let conn = test_connection();
        let c = category(&conn);
        assert!(matches!(
            save_question(&conn, None, draft(c, "   ", None), None, Utc::now()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            save_question(&conn, None, draft(c + 1, "x", None), None, Utc::now()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            save_question(&conn, Some(99), draft(c, "x", None), None, Utc::now()),
            Err(AppError::NotFound { id: 99, .. })
        ));
    }

    #[test]
    fn delete_removes_solutions_then_question() {
        let conn = test_connection();
        let c = category(&conn);
        let q = save_question(&conn, None, draft(c, "a", None), Some(java("x")), Utc::now())
            .unwrap()
            .question;
        add_solution(
            &conn,
            q.id,
            SolutionDraft {
                language: "Python".into(),
                code: "pass".into(),
            },
        )
        .unwrap();

        assert_eq!(delete_question(&conn, q.id).unwrap(), 2);
        assert!(repository::get_question(&conn, q.id).unwrap().is_none());
        assert!(repository::solutions_for_question(&conn, q.id).unwrap().is_empty());
        assert!(matches!(
            delete_question(&conn, q.id),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn duplicate_language_is_reported() {
        let conn = test_connection();
        let c = category(&conn);
        let q = save_question(&conn, None, draft(c, "a", None), Some(java("v1")), Utc::now())
            .unwrap()
            .question;

        let err = add_solution(&conn, q.id, java("v2")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateLanguage(ref l) if l == "Java"));
        assert_eq!(repository::solutions_for_question(&conn, q.id).unwrap().len(), 1);
    }

    #[test]
    fn free_text_languages_are_accepted() {
        let conn = test_connection();
        let c = category(&conn);
        let q = save_question(&conn, None, draft(c, "a", None), None, Utc::now())
            .unwrap()
            .question;
        let s = add_solution(
            &conn,
            q.id,
            SolutionDraft {
                language: " Rust ".into(),
                code: "fn main() {}".into(),
            },
        )
        .unwrap();
        assert_eq!(s.language, "Rust");

        assert!(matches!(
            add_solution(&conn, q.id + 1, java("x")),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn solutions_are_deleted_independently() {
        let conn = test_connection();
        let c = category(&conn);
        let outcome = save_question(&conn, None, draft(c, "a", None), Some(java("x")), Utc::now())
            .unwrap();
        let solution = outcome.solution.unwrap();

        delete_solution(&conn, solution.id).unwrap();
        assert!(repository::get_question(&conn, outcome.question.id).unwrap().is_some());
        assert!(matches!(
            delete_solution(&conn, solution.id),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn next_available_date_skips_scheduled_days() {
        let conn = test_connection();
        let c = category(&conn);
        let today = date(2024, 2, 1);
        save_question(&conn, None, draft(c, "a", Some(today)), None, Utc::now()).unwrap();
        save_question(&conn, None, draft(c, "b", Some(date(2024, 2, 2))), None, Utc::now()).unwrap();

        assert_eq!(next_available_date(&conn, today).unwrap(), date(2024, 2, 3));
        assert_eq!(occupied_dates(&conn).unwrap(), vec![today, date(2024, 2, 2)]);
    }
}
