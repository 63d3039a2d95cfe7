// lib/src/config/config_defaults.rs

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIRECTORY: &str = "./data";
pub const DEFAULT_REFERENCE_FILE: &str = "caresync_seed_data.json";
pub const DEFAULT_SLED_NAME: &str = "caresync.sled";
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 8;
pub const DEFAULT_COOKIE_NAME: &str = "caresync_session";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Development-only secret; startup warns when it is still in use.
pub const DEFAULT_SESSION_SECRET: &str = "caresync-development-secret-change-me";

pub const ENV_SESSION_SECRET: &str = "CARESYNC_SESSION_SECRET";
pub const ENV_DATA_DIR: &str = "CARESYNC_DATA_DIR";
pub const ENV_ADMIN_PASSWORD: &str = "CARESYNC_ADMIN_PASSWORD";

pub fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub fn default_port() -> u16 {
    DEFAULT_PORT
}

pub fn default_data_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIRECTORY)
}

pub fn default_reference_file() -> String {
    DEFAULT_REFERENCE_FILE.to_string()
}

pub fn default_sled_name() -> String {
    DEFAULT_SLED_NAME.to_string()
}

pub fn default_cache_capacity() -> u64 {
    DEFAULT_CACHE_CAPACITY
}

pub fn default_session_secret() -> String {
    DEFAULT_SESSION_SECRET.to_string()
}

pub fn default_session_ttl_hours() -> i64 {
    DEFAULT_SESSION_TTL_HOURS
}

pub fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

pub fn default_admin_username() -> String {
    DEFAULT_ADMIN_USERNAME.to_string()
}
