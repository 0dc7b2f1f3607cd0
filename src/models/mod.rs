pub mod app;
pub mod report;
pub mod submission;

// Re-exports for convenience
pub use app::*;
pub use report::*;
pub use submission::*;
