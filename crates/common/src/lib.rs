/**
 * Trait for any store that can list, read and write
 *  posts by path with optimistic-concurrency revisions.
 * Think of this as what lets us treat any backend as
 *  the persistence layer for the editor, such as
 *  - the GitHub contents API
 *  - a local directory
 *  - a simple hash map (testkit)
 */
pub mod content_provider;
/**
 * Bearer credential type and the store that persists
 *  and validates it against the remote identity endpoint.
 */
pub mod credential_provider;
/**
 * The post document model and its front-matter codec.
 *  Pure functions, no I/O.
 */
pub mod post;
/**
 * The editor session state machine: authenticate,
 *  list, open, save-as-create-or-update.
 */
pub mod session;

pub mod testkit;

pub mod prelude {
    pub use crate::content_provider::{ContentProvider, Entry, FileContent, Revision, StoreError};
    pub use crate::credential_provider::{Credential, CredentialError, CredentialStore};
    pub use crate::post::front_matter::{self, FrontMatterError};
    pub use crate::post::{post_path, slugify, Post};
    pub use crate::session::{EditorSession, SessionError, SessionState};
}
