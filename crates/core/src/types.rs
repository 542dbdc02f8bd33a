/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Audio durations are stored as fractional seconds (`DOUBLE PRECISION`).
pub type DurationSecs = f64;
