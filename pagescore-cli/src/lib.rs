// All core functionality is in pagescore-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod render;

// Re-export core types for convenience
pub use pagescore_core::*;

// Re-export rendering helpers
pub use render::{render_json, render_text};
