// src/lib.rs

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod filter;
pub mod models;
pub mod repository;
pub mod schedule;

use crate::config::Config;
use crate::constants::DB_FILE_NAME;
use crate::models::AppState;
use chrono::Local;
use log::info;
use rusqlite::Connection;
use std::fs;
use tauri::Manager;

pub fn run(config: Config) {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let db_path = match &config.db_path {
                Some(path) => path.clone(),
                None => {
                    let app_data_dir = app.path().app_data_dir()?;
                    if !app_data_dir.exists() {
                        fs::create_dir_all(&app_data_dir)?;
                    }
                    app_data_dir.join(DB_FILE_NAME)
                }
            };
            info!("Database path: {:?}", db_path);
            let conn = Connection::open(&db_path)?;

            // Init Database (Schema + Seeds)
            database::init_db(&conn, config.seed_on_first_run, Local::now().date_naive())?;

            app.manage(AppState::new(conn, config.clone()));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_categories,
            commands::load_catalog,
            commands::question_of_the_day,
            commands::search_questions,
            commands::supported_languages,
            commands::open_external_url,
            commands::sign_in,
            commands::sign_out,
            commands::current_session,
            commands::occupied_dates,
            commands::next_available_date,
            commands::save_question,
            commands::delete_question,
            commands::add_solution,
            commands::delete_solution
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
