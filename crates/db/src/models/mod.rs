//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus whatever insert DTOs the repositories accept.

pub mod feedback;
pub mod feedback_category;
pub mod public_space;
pub mod user;
