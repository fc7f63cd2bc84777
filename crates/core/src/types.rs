/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Schema version tag stamped on every persisted survey document.
pub const SURVEY_VERSION: &str = "1.0";
