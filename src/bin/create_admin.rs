// src/bin/create_admin.rs
//
// Provisions an admin account in the database named by DSA_DAILY_DB_PATH.
// Usage: create_admin <email> <password>

use chrono::{Local, Utc};
use dsa_daily_lib::config::Config;
use dsa_daily_lib::constants::{DEFAULT_LOG_FILTER, ENV_DB_PATH};
use dsa_daily_lib::error::AppError;
use dsa_daily_lib::{auth, database};
use log::{error, info};
use rusqlite::Connection;
use std::process::ExitCode;

fn main() -> ExitCode {
    // .env may carry RUST_LOG, so it goes before the logger.
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {:?}", path);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [email, password] = args.as_slice() else {
        eprintln!("Usage: create_admin <email> <password>");
        return ExitCode::from(2);
    };

    let config = Config::load();
    let Some(db_path) = config.db_path else {
        eprintln!("{} must point at the application database", ENV_DB_PATH);
        return ExitCode::from(2);
    };

    let result = Connection::open(&db_path)
        .map_err(AppError::from)
        .and_then(|conn| {
            database::init_db(&conn, config.seed_on_first_run, Local::now().date_naive())?;
            auth::create_admin_account(&conn, email, password, Utc::now())
        });

    match result {
        Ok(id) => {
            println!("Created admin account {} (ID: {})", email.trim().to_lowercase(), id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("create_admin failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
