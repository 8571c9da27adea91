pub mod config;
pub mod driver;
pub mod error;
pub mod logger;
pub mod runner;

// Re-export commonly used types
pub use error::{LoctestError, Result};
