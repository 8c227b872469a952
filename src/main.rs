// src/main.rs

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use dsa_daily_lib::config::Config;
use dsa_daily_lib::constants::DEFAULT_LOG_FILTER;
use log::info;

fn main() {
    // .env may carry RUST_LOG, so it goes before the logger.
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {:?}", path);
    }

    info!("Starting DSA Daily...");
    dsa_daily_lib::run(Config::load());
}
