//! Service layer
//!
//! Services hold the dispatcher's decision logic. They use repositories for
//! all I/O so the logic can be exercised against fakes.

mod dispatch;

// Re-export traits
pub use dispatch::DispatchService;

// Re-export implementations
pub use dispatch::StandardDispatchService;
