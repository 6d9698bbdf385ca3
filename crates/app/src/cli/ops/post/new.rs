use std::path::PathBuf;

use clap::Args;

use common::prelude::{front_matter, slugify, Post};

#[derive(Args, Debug, Clone)]
pub struct New {
    /// Title of the new post
    pub title: String,

    /// Where to write the draft; defaults to ./<slug>.md
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostNewError {
    #[error("Draft already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("Failed to write draft: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for New {
    type Error = PostNewError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let file = match &self.file {
            Some(file) => file.clone(),
            None => PathBuf::from(format!("{}.md", slugify(&self.title))),
        };
        if file.exists() {
            return Err(PostNewError::AlreadyExists(file));
        }

        let post = Post::new(&self.title, chrono::Local::now().naive_local());
        std::fs::write(&file, front_matter::serialize(&post))?;
        Ok(format!("Created draft {}", file.display()))
    }
}
