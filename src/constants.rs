// src/constants.rs

// --- Storage ---
pub const DB_FILE_NAME: &str = "dsa_daily.db";

// --- Environment Keys ---
pub const ENV_DB_PATH: &str = "DSA_DAILY_DB_PATH";
pub const ENV_ADMIN_USERNAME: &str = "DSA_DAILY_ADMIN_USERNAME";
pub const ENV_ADMIN_PASSWORD: &str = "DSA_DAILY_ADMIN_PASSWORD";
pub const ENV_SEED: &str = "DSA_DAILY_SEED";
pub const DEFAULT_LOG_FILTER: &str = "info";

// --- Solutions ---
// Order matches the admin form's language picker.
pub const SUPPORTED_LANGUAGES: [&str; 6] = ["JavaScript", "Python", "Java", "C++", "C", "TypeScript"];

// --- Search ---
pub const MAX_SEARCH_TERM_CHARS: usize = 200;
