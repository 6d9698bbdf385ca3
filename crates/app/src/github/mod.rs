mod client;
mod credentials;
mod store;

pub use client::{ApiError, ContentsEntry, ContentsFile, GithubClient};
pub use credentials::TokenFile;
pub use store::GithubStore;
