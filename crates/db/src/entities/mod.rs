//! `SeaORM` entity definitions.

pub mod ml_requests;
pub mod stored_files;
pub mod users;
