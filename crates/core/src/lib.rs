//! Domain logic for the CrowdSense feedback platform.
//!
//! Everything in this crate is free of I/O: validation rules, the running
//! mean used for space ratings, and the shared error taxonomy. The `db` and
//! `api` crates build on these types.

pub mod error;
pub mod feedback;
pub mod pagination;
pub mod rating;
pub mod roles;
pub mod space;
pub mod types;
