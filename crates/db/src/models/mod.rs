//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Join/view structs for the read paths that span several tables

pub mod character;
pub mod chat_log;
pub mod chat_room;
pub mod field;
pub mod friend;
pub mod rank;
pub mod status;
pub mod tag;
pub mod user;
