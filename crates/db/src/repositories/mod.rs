//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row writes open their
//! own transaction; dropping it uncommitted rolls everything back.

pub mod character_repo;
pub mod chat_log_repo;
pub mod chat_room_repo;
pub mod field_repo;
pub mod friend_repo;
pub mod prompt_repo;
pub mod rank_repo;
pub mod tag_repo;
pub mod user_repo;

pub use character_repo::CharacterRepo;
pub use chat_log_repo::ChatLogRepo;
pub use chat_room_repo::ChatRoomRepo;
pub use field_repo::FieldRepo;
pub use friend_repo::FriendRepo;
pub use prompt_repo::PromptRepo;
pub use rank_repo::RankRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
