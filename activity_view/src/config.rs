pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
pub const SERVER_URL_ENV: &str = "ACTIVITY_SERVER_URL";
