use std::path::PathBuf;

use clap::Args;

use common::prelude::{front_matter, FrontMatterError, SessionError};

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Publish {
    /// Draft file to publish
    pub file: PathBuf,

    /// Repository path of an existing post to update; omitted means create
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostPublishError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Failed to read draft: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid draft: {0}")]
    Parse(#[from] FrontMatterError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Publish {
    type Error = PostPublishError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let text = std::fs::read_to_string(&self.file)?;
        let draft = front_matter::deserialize(&text)?;

        let session = ctx.session()?;
        session.authenticate().await?;

        // Updating an existing post means opening it first, so the save
        // targets its path and revision instead of creating a new file.
        match &self.path {
            Some(path) => {
                session.open(path).await?;
            }
            None => session.new_document()?,
        }

        let saved = session.save(&draft).await?;
        let verb = if saved.created { "Created" } else { "Updated" };
        Ok(format!(
            "{} {} at revision {}",
            verb, saved.path, saved.revision
        ))
    }
}
