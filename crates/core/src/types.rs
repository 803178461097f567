/// All numeric database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Chat rooms are addressed by an opaque UUID rather than a sequence id.
pub type RoomId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
