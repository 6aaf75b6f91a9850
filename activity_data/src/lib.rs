use const_format::concatcp;
use thiserror::Error;

mod activity_store;

pub use activity_store::*;

pub const DATA_DIR: &str = "data/";
pub const SESSIONS_PATH: &str = concatcp!(DATA_DIR, "sessions.json");
pub const WEATHER_PATH: &str = concatcp!(DATA_DIR, "weather.json");

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no session with id {0}")]
    UnknownSession(i64),
}

#[test]
fn error_messages() {
    assert_eq!(DataError::Io("denied".into()).to_string(), "io error: denied");
    assert_eq!(DataError::Parse("eof".into()).to_string(), "parse error: eof");
    assert_eq!(DataError::UnknownSession(9).to_string(), "no session with id 9");
}
