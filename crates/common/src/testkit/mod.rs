//! Lightweight in-memory providers for exercising the editor session
//! without external infrastructure.
//!
//! ```rust,ignore
//! use common::testkit::{MemoryCredentials, MemoryStore};
//!
//! let credentials = MemoryCredentials::new("octocat");
//! credentials.accept("good-token", "octocat");
//! let store = MemoryStore::gated(credentials.clone());
//! ```

mod memory_credentials;
mod memory_store;

pub use memory_credentials::MemoryCredentials;
pub use memory_store::MemoryStore;
