//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. Methods that must run inside the
//! feedback ingestion transaction take `&mut PgConnection` instead.

pub mod feedback_category_repo;
pub mod feedback_repo;
pub mod public_space_repo;
pub mod user_repo;

pub use feedback_category_repo::FeedbackCategoryRepo;
pub use feedback_repo::FeedbackRepo;
pub use public_space_repo::PublicSpaceRepo;
pub use user_repo::UserRepo;
