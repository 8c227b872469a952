// src/database.rs

use crate::error::AppResult;
use crate::models::JsonSeed;
use chrono::{Days, NaiveDate, Utc};
use log::{debug, info};
use rusqlite::{params, Connection};

pub fn init_db(conn: &Connection, seed: bool, today: NaiveDate) -> AppResult<()> {
    debug!("init_db: Checking database schema...");

    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            category_name TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            difficulty TEXT NOT NULL CHECK (difficulty IN ('Easy','Medium','Hard')),
            image_url TEXT,
            scheduled_date TEXT,
            reference_link TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_questions_scheduled_date ON questions (scheduled_date);
        CREATE TABLE IF NOT EXISTS solutions (
            id INTEGER PRIMARY KEY,
            question_id INTEGER NOT NULL REFERENCES questions(id),
            language TEXT NOT NULL,
            code TEXT NOT NULL,
            UNIQUE (question_id, language)
        );
        CREATE TABLE IF NOT EXISTS admin_accounts (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        ",
    )?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 && seed {
        info!("init_db: Tables empty. Seeding data...");
        seed_data(conn, today)?;
    }

    Ok(())
}

/// Loads the bundled question set, scheduling one question per day from `today`.
fn seed_data(conn: &Connection, today: NaiveDate) -> AppResult<()> {
    let data = include_str!("data/seed.json");
    let seed: JsonSeed = serde_json::from_str(data)?;
    let now = Utc::now();

    let tx = conn.unchecked_transaction()?;
    {
        let mut c_stmt =
            tx.prepare("INSERT OR IGNORE INTO categories (category_name, created_at) VALUES (?, ?)")?;
        for name in &seed.categories {
            c_stmt.execute(params![name, now])?;
        }

        let mut q_stmt = tx.prepare(
            "INSERT INTO questions (category_id, title, description, difficulty, scheduled_date, reference_link, tags, created_at, updated_at)
             SELECT id, ?, ?, ?, ?, ?, ?, ?, ? FROM categories WHERE category_name = ?",
        )?;
        let mut s_stmt =
            tx.prepare("INSERT INTO solutions (question_id, language, code) VALUES (?, ?, ?)")?;

        for (offset, q) in seed.questions.iter().enumerate() {
            let date = today.checked_add_days(Days::new(offset as u64));
            let tags = serde_json::to_string(&q.tags)?;
            let inserted = q_stmt.execute(params![
                q.title,
                q.description,
                q.difficulty,
                date,
                q.reference_link,
                tags,
                now,
                now,
                q.category
            ])?;
            if inserted == 0 {
                debug!("Skipping '{}': unknown category '{}'", q.title, q.category);
                continue;
            }
            let question_id = tx.last_insert_rowid();
            for s in &q.solutions {
                s_stmt.execute(params![question_id, s.language, s.code])?;
            }
        }
    }
    tx.commit()?;

    info!(
        "Seeded {} categories and {} questions",
        seed.categories.len(),
        seed.questions.len()
    );
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_db(&conn, false, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_schedules_consecutive_days() {
        let conn = Connection::open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        init_db(&conn, true, today).unwrap();

        let first: NaiveDate = conn
            .query_row(
                "SELECT scheduled_date FROM questions ORDER BY scheduled_date LIMIT 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(first, today);

        let distinct: i64 = conn
            .query_row("SELECT count(DISTINCT scheduled_date) FROM questions", [], |r| r.get(0))
            .unwrap();
        let total: i64 = conn
            .query_row("SELECT count(*) FROM questions", [], |r| r.get(0))
            .unwrap();
        assert!(total > 0);
        assert_eq!(distinct, total);
    }

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        init_db(&conn, true, today).unwrap();
        let before: i64 = conn
            .query_row("SELECT count(*) FROM questions", [], |r| r.get(0))
            .unwrap();
        init_db(&conn, true, today).unwrap();
        let after: i64 = conn
            .query_row("SELECT count(*) FROM questions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let conn = test_connection();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
