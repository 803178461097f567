//! Domain logic for the persona chat backend.
//!
//! Everything here is pure: no database, no network. The `db` crate and the
//! HTTP layer build on these types and functions.

pub mod character;
pub mod error;
pub mod history;
pub mod image_prompt;
pub mod image_url;
pub mod persona;
pub mod types;
pub mod validation;
