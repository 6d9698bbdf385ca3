use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use common::prelude::EditorSession;
use inkwell::github::{ApiError, GithubClient, GithubStore, TokenFile};
use inkwell::local::{LocalIdentity, LocalStore};
use inkwell::state::{AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum OpContextError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct OpContext {
    /// Optional custom config path (defaults to ~/.inkwell)
    pub config_path: Option<PathBuf>,
    /// When set, sessions run against this directory instead of GitHub
    pub local_root: Option<PathBuf>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>, local_root: Option<PathBuf>) -> Self {
        Self {
            config_path,
            local_root,
        }
    }

    pub fn state(&self) -> Result<AppState, StateError> {
        AppState::load(self.config_path.clone())
    }

    /// Build an editor session against the configured repository, or
    /// against `--local-root` when given. The local backend needs no config
    /// directory; it falls back to the default posts folder when none is
    /// initialized.
    pub fn session(&self) -> Result<EditorSession, OpContextError> {
        if let Some(root) = &self.local_root {
            let posts_dir = self
                .state()
                .map(|state| state.config.posts_dir)
                .unwrap_or_else(|_| "_posts".to_string());
            let store = Arc::new(LocalStore::new(root.clone()));
            let credentials = Arc::new(LocalIdentity);
            return Ok(EditorSession::new(store, credentials, posts_dir));
        }

        let state = self.state()?;
        let client = GithubClient::new(&state.api_url())?;
        let credentials = Arc::new(TokenFile::new(
            state.token_path.clone(),
            state.config.owner.clone(),
            client.clone(),
        ));
        let store = Arc::new(GithubStore::new(
            client,
            state.config.repo.clone(),
            state.config.branch.clone(),
            credentials.clone(),
        ));
        Ok(EditorSession::new(
            store,
            credentials,
            state.config.posts_dir,
        ))
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
