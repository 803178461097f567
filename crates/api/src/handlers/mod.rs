pub mod auth;
pub mod characters;
pub mod chat_rooms;
pub mod fields;
pub mod follows;
pub mod images;
pub mod tags;
pub mod uploads;
pub mod users;
