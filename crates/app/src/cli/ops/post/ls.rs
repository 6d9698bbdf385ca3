use clap::Args;

use common::prelude::SessionError;

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Ls;

#[derive(Debug, thiserror::Error)]
pub enum PostLsError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ls {
    type Error = PostLsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = ctx.session()?;
        session.authenticate().await?;

        let mut entries = session.list().await?;
        // newest first; post filenames start with the date
        entries.sort_by(|a, b| b.name.cmp(&a.name));

        if entries.is_empty() {
            return Ok("No posts found".to_string());
        }
        let output = entries
            .iter()
            .map(|entry| match entry.modified {
                Some(modified) => {
                    format!("{}  (modified {})", entry.path, modified.format("%Y-%m-%d %H:%M"))
                }
                None => entry.path.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
