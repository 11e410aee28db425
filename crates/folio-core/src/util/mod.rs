//! Utility modules for file operations and path handling.
//!
//! # Modules
//!
//! - [`files`]: Async file reading and inspection helpers
//! - [`paths`]: Request-path sanitising and containment checks

pub mod files;
pub mod paths;
