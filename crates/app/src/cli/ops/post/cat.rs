use clap::Args;

use common::prelude::SessionError;

use crate::cli::op::OpContextError;

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// Repository path of the post, e.g. _posts/2024-03-01-hello.md
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PostCatError {
    #[error(transparent)]
    Context(#[from] OpContextError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Cat {
    type Error = PostCatError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = ctx.session()?;
        session.authenticate().await?;
        let post = session.open(&self.path).await?;

        let mut lines = vec![
            format!("Title:      {}", post.title),
            format!("Date:       {}", post.date.format("%Y-%m-%d %H:%M:%S")),
            format!("Categories: {}", post.categories.join(", ")),
            format!("Tags:       {}", post.tags.join(", ")),
        ];
        if post.pin {
            lines.push("Pinned".to_string());
        }
        lines.push(String::new());
        lines.push(post.body);
        Ok(lines.join("\n"))
    }
}
