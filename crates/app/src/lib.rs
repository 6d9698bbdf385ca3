// Backends and app state for the inkwell CLI.

// GitHub contents API backend
pub mod github;

// Local directory backend
pub mod local;

// App state (configuration, paths, token slot)
pub mod state;

// Re-exports for consumers
pub use state::{AppConfig, AppState, StateError};
