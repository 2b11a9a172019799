//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. The file and stats repositories implement the traits
//! defined in the core crate.

pub mod file;
pub mod ml_request;
pub mod stats;
pub mod user;

pub use file::FileRecordRepository;
pub use ml_request::MlRequestRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;
