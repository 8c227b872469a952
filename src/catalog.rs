// src/catalog.rs

use crate::constants::MAX_SEARCH_TERM_CHARS;
use crate::error::{AppError, AppResult};
use crate::filter;
use crate::models::{AdminSession, Catalog, Question, QuestionFilter, Reassignment, Solution};
use crate::repository;
use crate::schedule;
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use rusqlite::Connection;
use std::collections::HashMap;

// --- Public Interface ---

/// Mount/session-change load: an admin load pushes overdue questions
/// forward before the question of the day is picked.
pub fn load_catalog(
    conn: &Connection,
    session: Option<&AdminSession>,
    today: NaiveDate,
) -> AppResult<Catalog> {
    let is_admin = session.is_some();
    debug!("Loading catalog for {} (admin: {})", today, is_admin);

    let mut questions = repository::list_questions(conn)?;
    let rescheduled = if is_admin {
        reschedule_overdue(conn, &mut questions, today)?
    } else {
        Vec::new()
    };
    assemble(conn, is_admin, today, questions, rescheduled)
}

/// Same view as `load_catalog` without touching storage.
pub fn browse_catalog(
    conn: &Connection,
    session: Option<&AdminSession>,
    today: NaiveDate,
) -> AppResult<Catalog> {
    let questions = repository::list_questions(conn)?;
    assemble(conn, session.is_some(), today, questions, Vec::new())
}

/// The visible part of the catalog narrowed by a filter. Read-only.
pub fn search_questions(
    conn: &Connection,
    session: Option<&AdminSession>,
    today: NaiveDate,
    filter: &QuestionFilter,
) -> AppResult<Vec<Question>> {
    if filter.search.trim().chars().count() > MAX_SEARCH_TERM_CHARS {
        return Err(AppError::Validation(format!(
            "Search term is longer than {} characters",
            MAX_SEARCH_TERM_CHARS
        )));
    }

    let catalog = browse_catalog(conn, session, today)?;
    let result = filter::filter_questions(&catalog.questions, filter);
    debug!(
        "Search '{}' (category: {:?}) matched {} of {}",
        filter.search,
        filter.category_id,
        result.len(),
        catalog.questions.len()
    );
    Ok(result)
}

fn assemble(
    conn: &Connection,
    is_admin: bool,
    today: NaiveDate,
    questions: Vec<Question>,
    rescheduled: Vec<Reassignment>,
) -> AppResult<Catalog> {
    let categories = repository::list_categories(conn)?;

    let question_of_the_day = schedule::question_of_the_day(&questions, today).cloned();
    match &question_of_the_day {
        Some(q) => debug!("Question of the day: {} (ID: {})", q.title, q.id),
        None => debug!("No question scheduled for {}", today),
    }

    let visible = if is_admin {
        questions
    } else {
        question_of_the_day.iter().cloned().collect()
    };

    let ids: Vec<i64> = visible.iter().map(|q| q.id).collect();
    let solutions = group_by_question(repository::solutions_for_questions(conn, &ids)?);

    Ok(Catalog {
        today,
        categories,
        questions: visible,
        solutions,
        question_of_the_day,
        rescheduled,
    })
}

/// Persists the reschedule plan in one transaction, then mirrors it in memory.
pub fn reschedule_overdue(
    conn: &Connection,
    questions: &mut [Question],
    today: NaiveDate,
) -> AppResult<Vec<Reassignment>> {
    let plan = schedule::plan_reschedule(questions, today);
    if plan.is_empty() {
        return Ok(plan);
    }

    let now = Utc::now();
    let tx = conn.unchecked_transaction()?;
    for r in &plan {
        repository::update_scheduled_date(&tx, r.question_id, r.to, now)?;
    }
    tx.commit()?;

    info!("Rescheduled {} overdue question(s)", plan.len());
    schedule::apply_reassignments(questions, &plan);
    Ok(plan)
}

fn group_by_question(solutions: Vec<Solution>) -> HashMap<i64, Vec<Solution>> {
    let mut grouped: HashMap<i64, Vec<Solution>> = HashMap::new();
    for s in solutions {
        grouped.entry(s.question_id).or_default().push(s);
    }
    grouped
}
