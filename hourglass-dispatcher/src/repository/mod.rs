//! Repository layer
//!
//! Repositories hide the I/O the dispatcher depends on: where the roster
//! comes from and how a unit of work is started. They carry no dispatch
//! logic of their own.
//!
//! All repositories are trait-based to enable testing and mocking.

mod backend;
mod roster;

// Re-export traits
pub use backend::ExecutionBackend;
pub use roster::RosterRepository;

// Re-export implementations
pub use backend::HttpExecutionBackend;
pub use roster::{DirectoryRosterRepository, FileRosterRepository, StaticRosterRepository};
