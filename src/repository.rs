// src/repository.rs

use crate::models::{Category, Question, QuestionDraft, Solution};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

const QUESTION_COLUMNS: &str = "id, category_id, title, description, difficulty, image_url, scheduled_date, reference_link, tags, is_active, created_at, updated_at";

fn question_from_row(row: &Row) -> Result<Question> {
    let tags_json: String = row.get(8)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(Question {
        id: row.get(0)?,
        category_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        difficulty: row.get(4)?,
        image_url: row.get(5)?,
        scheduled_date: row.get(6)?,
        reference_link: row.get(7)?,
        tags,
        is_active: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn solution_from_row(row: &Row) -> Result<Solution> {
    Ok(Solution {
        id: row.get(0)?,
        question_id: row.get(1)?,
        language: row.get(2)?,
        code: row.get(3)?,
    })
}

fn tags_to_json(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

// --- Categories ---

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, category_name, created_at FROM categories ORDER BY created_at ASC, id ASC")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                category_name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn category_exists(conn: &Connection, category_id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)",
        [category_id],
        |r| r.get(0),
    )
}

// --- Questions ---

/// All questions by scheduled date, unscheduled ones last.
pub fn list_questions(conn: &Connection) -> Result<Vec<Question>> {
    let sql = format!(
        "SELECT {} FROM questions
         ORDER BY scheduled_date IS NULL, scheduled_date ASC, id ASC",
        QUESTION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let questions = stmt
        .query_map([], question_from_row)?
        .collect::<Result<Vec<_>>>()?;
    debug!("[DB] Loaded {} questions", questions.len());
    Ok(questions)
}

pub fn get_question(conn: &Connection, question_id: i64) -> Result<Option<Question>> {
    let sql = format!("SELECT {} FROM questions WHERE id = ?", QUESTION_COLUMNS);
    conn.query_row(&sql, [question_id], question_from_row).optional()
}

/// Ids of every question scheduled on `date`. More than one means the
/// one-question-per-day convention was broken by an earlier write.
pub fn question_ids_on_date(conn: &Connection, date: NaiveDate) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM questions WHERE scheduled_date = ? ORDER BY id")?;
    let ids = stmt
        .query_map([date], |row| row.get(0))?
        .collect::<Result<Vec<i64>>>()?;
    Ok(ids)
}

pub fn occupied_dates(conn: &Connection) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT scheduled_date FROM questions
         WHERE scheduled_date IS NOT NULL
         ORDER BY scheduled_date ASC",
    )?;
    let dates = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<NaiveDate>>>()?;
    Ok(dates)
}

pub fn insert_question(conn: &Connection, draft: &QuestionDraft, now: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO questions (category_id, title, description, difficulty, image_url, scheduled_date, reference_link, tags, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            draft.category_id,
            draft.title,
            draft.description,
            draft.difficulty,
            draft.image_url,
            draft.scheduled_date,
            draft.reference_link,
            tags_to_json(&draft.tags)?,
            draft.is_active,
            now,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_question(
    conn: &Connection,
    question_id: i64,
    draft: &QuestionDraft,
    now: DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        "UPDATE questions
         SET category_id = ?, title = ?, description = ?, difficulty = ?, image_url = ?,
             scheduled_date = ?, reference_link = ?, tags = ?, is_active = ?, updated_at = ?
         WHERE id = ?",
        params![
            draft.category_id,
            draft.title,
            draft.description,
            draft.difficulty,
            draft.image_url,
            draft.scheduled_date,
            draft.reference_link,
            tags_to_json(&draft.tags)?,
            draft.is_active,
            now,
            question_id
        ],
    )
}

pub fn update_scheduled_date(
    conn: &Connection,
    question_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        "UPDATE questions SET scheduled_date = ?, updated_at = ? WHERE id = ?",
        params![date, now, question_id],
    )
}

pub fn delete_question(conn: &Connection, question_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM questions WHERE id = ?", [question_id])
}

// --- Solutions ---

/// Batched lookup of the solutions for a set of questions.
pub fn solutions_for_questions(conn: &Connection, question_ids: &[i64]) -> Result<Vec<Solution>> {
    if question_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = question_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT id, question_id, language, code
         FROM solutions
         WHERE question_id IN ({})
         ORDER BY question_id ASC, id ASC",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let solutions = stmt
        .query_map(rusqlite::params_from_iter(question_ids.iter()), solution_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(solutions)
}

pub fn solutions_for_question(conn: &Connection, question_id: i64) -> Result<Vec<Solution>> {
    solutions_for_questions(conn, &[question_id])
}

pub fn get_solution(conn: &Connection, solution_id: i64) -> Result<Option<Solution>> {
    conn.query_row(
        "SELECT id, question_id, language, code FROM solutions WHERE id = ?",
        [solution_id],
        solution_from_row,
    )
    .optional()
}

pub fn insert_solution(conn: &Connection, question_id: i64, language: &str, code: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO solutions (question_id, language, code) VALUES (?, ?, ?)",
        params![question_id, language, code],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_solutions_for_question(conn: &Connection, question_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM solutions WHERE question_id = ?", [question_id])
}

pub fn delete_solution(conn: &Connection, solution_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM solutions WHERE id = ?", [solution_id])
}

// --- Admin Accounts ---

pub fn insert_admin_account(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    now: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO admin_accounts (email, password_hash, created_at) VALUES (?, ?, ?)",
        params![email, password_hash, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn admin_password_hash(conn: &Connection, email: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT password_hash FROM admin_accounts WHERE email = ?",
        [email],
        |row| row.get(0),
    )
    .optional()
}
