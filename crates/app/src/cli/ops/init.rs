use clap::Args;
use url::Url;

use inkwell::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Repository holding the site, as "owner/name"
    #[arg(long)]
    pub repo: String,

    /// GitHub login allowed to edit
    #[arg(long)]
    pub owner: String,

    /// Branch to write to
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Folder within the repository that holds the posts
    #[arg(long, default_value = "_posts")]
    pub posts_dir: String,

    /// API base URL override (GitHub Enterprise)
    #[arg(long)]
    pub api_url: Option<Url>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            repo: self.repo.clone(),
            owner: self.owner.clone(),
            branch: self.branch.clone(),
            posts_dir: self.posts_dir.clone(),
            api_url: self.api_url.clone(),
        };
        let state = AppState::init(ctx.config_path.clone(), config)?;
        Ok(format!(
            "Initialized {} for {} in {}",
            state.config.repo,
            state.config.owner,
            state.app_dir.display()
        ))
    }
}
